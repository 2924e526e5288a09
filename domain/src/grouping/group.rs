//! Group - aggregator output unit

use crate::batch::{Element, distinct_hosts};
use crate::host::Host;
use std::sync::Arc;

/// Elements sharing one grouping-key value.
///
/// Always holds at least one element; groups are only created when the
/// first element for a key arrives.
#[derive(Debug, Clone)]
pub struct Group<P> {
    pub key: String,
    pub elements: Vec<Element<P>>,
}

impl<P> Group<P> {
    pub(crate) fn new(key: String, first: Element<P>) -> Self {
        Self {
            key,
            elements: vec![first],
        }
    }

    pub(crate) fn push(&mut self, element: Element<P>) {
        self.elements.push(element);
    }

    /// Raw element count (not distinct hosts)
    pub fn count(&self) -> usize {
        self.elements.len()
    }

    /// Distinct contributing hosts, sorted by name
    pub fn hosts(&self) -> Vec<Arc<Host>> {
        distinct_hosts(&self.elements)
    }

    /// Host names, sorted
    pub fn host_names(&self) -> Vec<String> {
        self.hosts().iter().map(|h| h.name.clone()).collect()
    }

    pub fn cached_summary(&self) -> CacheSummary {
        CacheSummary(self.elements.iter().map(|e| e.cached).collect())
    }
}

/// Per-element cache flags of a group, in element order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSummary(pub Vec<bool>);

impl CacheSummary {
    pub fn hits(&self) -> usize {
        self.0.iter().filter(|c| **c).count()
    }
}

impl std::fmt::Display for CacheSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flags: Vec<&str> = self
            .0
            .iter()
            .map(|c| if *c { "yes" } else { "no" })
            .collect();
        write!(f, "{}", flags.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosts_deduplicated_while_count_is_raw() {
        let a = Host::new("a", "https://a", "t").shared();
        let mut group = Group::new("bob".to_string(), Element::new(Arc::clone(&a), (), false));
        group.push(Element::new(Arc::clone(&a), (), true));

        assert_eq!(group.count(), 2);
        assert_eq!(group.host_names(), vec!["a"]);
    }

    #[test]
    fn test_cache_summary_display() {
        let summary = CacheSummary(vec![false, true]);
        assert_eq!(summary.to_string(), "no yes");
        assert_eq!(summary.hits(), 1);
    }
}
