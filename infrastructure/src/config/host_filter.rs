//! Host selection by name pattern

use fleetlab_domain::HostRegistry;
use regex::Regex;
use tracing::debug;

/// Keeps hosts whose name matches a regular expression
#[derive(Debug, Clone)]
pub struct HostFilter {
    pattern: Regex,
}

impl HostFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    pub fn apply(&self, registry: HostRegistry) -> HostRegistry {
        let before = registry.len();
        let filtered = registry.retain(|h| self.matches(&h.name));
        debug!(
            "Host filter '{}' kept {}/{} hosts",
            self.pattern,
            filtered.len(),
            before
        );
        filtered
    }
}
