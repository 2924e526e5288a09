//! Dispatch configuration from TOML (`[dispatch]` section)

use fleetlab_application::DispatchConfig;
use serde::{Deserialize, Serialize};

/// Raw dispatch configuration from TOML
///
/// ```toml
/// [dispatch]
/// max_in_flight = 8   # 0 or absent = unbounded
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Maximum number of concurrent host calls
    pub max_in_flight: Option<usize>,
}

impl FileDispatchConfig {
    pub fn to_dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            max_in_flight: self.max_in_flight,
        }
    }
}
