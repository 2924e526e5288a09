//! Infrastructure layer for fleetlab
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gitlab;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileCacheConfig, FileConfig, FileDispatchConfig,
    FileHostConfig, FileHttpConfig, FileOutputConfig, FileOutputFormat, HostFilter,
};
pub use gitlab::{CacheError, GitLabClient, ResponseCache};
