//! HTTP client configuration from TOML (`[http]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw HTTP configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileHttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Page size for list endpoints (GitLab caps this at 100)
    pub per_page: u32,
    /// A search that needs more pages than this fails for that host
    pub max_pages: u32,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            per_page: 100,
            max_pages: 20,
        }
    }
}

impl FileHttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
