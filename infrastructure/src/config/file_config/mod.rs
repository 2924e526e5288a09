//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod cache;
mod dispatch;
mod hosts;
mod http;
mod output;

pub use cache::FileCacheConfig;
pub use dispatch::FileDispatchConfig;
pub use hosts::FileHostConfig;
pub use http::FileHttpConfig;
pub use output::{FileOutputConfig, FileOutputFormat};

use fleetlab_domain::{DomainError, HostRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("no hosts configured (add a [[hosts]] entry)")]
    NoHosts,

    #[error("hosts[{index}]: name cannot be empty")]
    EmptyHostName { index: usize },

    #[error("duplicate host name '{0}'")]
    DuplicateHost(String),

    #[error("host '{0}': url cannot be empty")]
    EmptyUrl(String),

    #[error("host '{name}': url '{url}' must start with http:// or https://")]
    InvalidUrl { name: String, url: String },

    #[error("host '{0}': token cannot be empty")]
    EmptyToken(String),

    #[error("http.per_page must be between 1 and 100, got {0}")]
    InvalidPerPage(u32),

    #[error("http.max_pages must be at least 1")]
    InvalidMaxPages,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Configured GitLab instances, in dispatch order
    pub hosts: Vec<FileHostConfig>,
    /// Fan-out concurrency
    pub dispatch: FileDispatchConfig,
    /// Response cache
    pub cache: FileCacheConfig,
    /// HTTP client settings
    pub http: FileHttpConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.hosts.is_empty() {
            issues.push(ConfigValidationError::NoHosts);
        }

        let mut seen = HashSet::new();
        for (index, host) in self.hosts.iter().enumerate() {
            let name = host.name.trim();
            if name.is_empty() {
                issues.push(ConfigValidationError::EmptyHostName { index });
                continue;
            }
            if !seen.insert(name) {
                issues.push(ConfigValidationError::DuplicateHost(name.to_string()));
            }

            let url = host.url.trim();
            if url.is_empty() {
                issues.push(ConfigValidationError::EmptyUrl(name.to_string()));
            } else if !(url.starts_with("http://") || url.starts_with("https://")) {
                issues.push(ConfigValidationError::InvalidUrl {
                    name: name.to_string(),
                    url: url.to_string(),
                });
            }

            if host.token.trim().is_empty() {
                issues.push(ConfigValidationError::EmptyToken(name.to_string()));
            }
        }

        if !(1..=100).contains(&self.http.per_page) {
            issues.push(ConfigValidationError::InvalidPerPage(self.http.per_page));
        }
        if self.http.max_pages == 0 {
            issues.push(ConfigValidationError::InvalidMaxPages);
        }

        issues
    }

    /// Build the host registry in file order
    pub fn to_registry(&self) -> Result<HostRegistry, DomainError> {
        HostRegistry::new(self.hosts.iter().map(FileHostConfig::to_host).collect())
    }
}
