//! Host value object representing one configured GitLab endpoint

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A remote GitLab instance participating in a fan-out batch.
///
/// Hosts are identified by `name` alone: two hosts with the same name are
/// the same host for equality, hashing and ordering. The token is never
/// printed by `Debug`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Host {
    /// Display name, unique inside a registry
    pub name: String,
    /// Base URL of the instance (e.g. `https://gitlab.example.com`)
    pub url: String,
    /// Private API token
    #[serde(skip_serializing)]
    pub token: String,
}

impl Host {
    pub fn new(name: impl Into<String>, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            token: token.into(),
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Wrap into the shared handle every element and error refers to
    pub fn shared(self) -> Arc<Host> {
        Arc::new(self)
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Host {}

impl Hash for Host {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Host {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Host {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// Ordered collection of configured hosts with unique names
#[derive(Debug, Clone, Default)]
pub struct HostRegistry {
    hosts: Vec<Arc<Host>>,
}

impl HostRegistry {
    pub fn new(hosts: Vec<Host>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for host in &hosts {
            if !seen.insert(host.name.as_str()) {
                return Err(DomainError::DuplicateHost(host.name.clone()));
            }
        }
        Ok(Self {
            hosts: hosts.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn hosts(&self) -> &[Arc<Host>] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Keep only hosts whose name satisfies `keep`
    pub fn retain(mut self, keep: impl Fn(&Host) -> bool) -> Self {
        self.hosts.retain(|h| keep(h));
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.hosts.iter().map(|h| h.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let host = Host::new("main", "https://gitlab.example.com", "glpat-secret");
        let debug = format!("{:?}", host);
        assert!(debug.contains("main"));
        assert!(!debug.contains("glpat-secret"));
    }

    #[test]
    fn test_identity_is_name() {
        let a = Host::new("main", "https://a.example.com", "x");
        let b = Host::new("main", "https://b.example.com", "y");
        assert_eq!(a, b);
        assert!(Host::new("alpha", "", "") < Host::new("beta", "", ""));
    }

    #[test]
    fn test_base_url_trims_slash() {
        let host = Host::new("main", "https://gitlab.example.com/", "x");
        assert_eq!(host.base_url(), "https://gitlab.example.com");
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let err = HostRegistry::new(vec![
            Host::new("main", "https://a", "x"),
            Host::new("main", "https://b", "y"),
        ])
        .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateHost(name) if name == "main"));
    }

    #[test]
    fn test_registry_retain_keeps_order() {
        let registry = HostRegistry::new(vec![
            Host::new("prod-a", "https://a", "x"),
            Host::new("staging", "https://s", "x"),
            Host::new("prod-b", "https://b", "x"),
        ])
        .unwrap()
        .retain(|h| h.name.starts_with("prod"));
        assert_eq!(registry.names(), vec!["prod-a", "prod-b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_serialize_skips_token() {
        let host = Host::new("main", "https://gitlab.example.com", "glpat-secret");
        let json = serde_json::to_string(&host).unwrap();
        assert!(!json.contains("glpat-secret"));
    }
}
