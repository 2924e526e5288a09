//! Application-level configuration.
//!
//! - [`DispatchConfig`] - fan-out concurrency budget

pub mod dispatch_config;

pub use dispatch_config::DispatchConfig;
