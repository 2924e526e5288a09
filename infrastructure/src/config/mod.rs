//! Configuration file loading for fleetlab
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FLEETLAB_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./fleetlab.toml` or `./.fleetlab.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/fleetlab/config.toml`
//! 5. Default values

mod file_config;
mod host_filter;
mod loader;

pub use file_config::{
    ConfigValidationError, FileCacheConfig, FileConfig, FileDispatchConfig, FileHostConfig,
    FileHttpConfig, FileOutputConfig, FileOutputFormat,
};
pub use host_filter::HostFilter;
pub use loader::ConfigLoader;
