//! Batch report - groups plus host errors, ready for presentation

use fleetlab_domain::{Group, HostError};
use serde::Serialize;

/// Outcome of one fan-out batch
#[derive(Debug, Clone)]
pub struct BatchReport<P> {
    pub groups: Vec<Group<P>>,
    pub errors: Vec<HostError>,
}

impl<P> BatchReport<P> {
    pub fn new(groups: Vec<Group<P>>, errors: Vec<HostError>) -> Self {
        Self { groups, errors }
    }

    /// Number of groups
    pub fn found(&self) -> usize {
        self.groups.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Sum of element counts across groups
    pub fn total_elements(&self) -> usize {
        self.groups.iter().map(|g| g.count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Put errors from an earlier batch in front of this one's
    pub fn with_prior_errors(mut self, mut prior: Vec<HostError>) -> Self {
        prior.append(&mut self.errors);
        self.errors = prior;
        self
    }

    /// Serializable summary (key, count, hosts, cache flags, errors)
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            groups: self
                .groups
                .iter()
                .map(|g| GroupSummary {
                    key: g.key.clone(),
                    count: g.count(),
                    hosts: g.host_names(),
                    cached: g.cached_summary().0,
                })
                .collect(),
            errors: self.errors.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub groups: Vec<GroupSummary>,
    pub errors: Vec<HostError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub hosts: Vec<String>,
    pub cached: Vec<bool>,
}
