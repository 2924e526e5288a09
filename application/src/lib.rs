//! Application layer for fleetlab
//!
//! This crate contains the bounded fan-out engine, port definitions, and
//! the use cases built on them. It depends only on the domain layer.

pub mod config;
pub mod fanout;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::DispatchConfig;
pub use fanout::{BatchReport, CallMode, Conduit, Dispatcher, Limiter};
pub use ports::{
    host_client::{CacheMode, HostCallError, HostClient},
    progress::{DispatchProgress, NoProgress},
};
pub use use_cases::block_users::{
    BlockTargets, BlockUsersError, BlockUsersInput, BlockUsersUseCase,
};
pub use use_cases::search_users::{SearchUsersError, SearchUsersInput, SearchUsersUseCase};
