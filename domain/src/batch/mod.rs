//! Batch value objects - what a fan-out produces per host.
//!
//! - [`Element`] - one successful per-host result, tagged with its origin
//! - [`HostError`] - one failed per-host attempt
//! - [`FetchResult`] - what a host capability hands back (value + cache flag)

use crate::host::Host;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// One successful per-host result.
///
/// Created by a dispatch task right after a successful call and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Element<P> {
    /// Origin endpoint
    pub host: Arc<Host>,
    /// Domain record returned by the call
    pub payload: P,
    /// `true` if served from the client's response cache
    pub cached: bool,
}

impl<P> Element<P> {
    pub fn new(host: Arc<Host>, payload: P, cached: bool) -> Self {
        Self {
            host,
            payload,
            cached,
        }
    }
}

/// Distinct hosts of a set of elements, sorted by name
pub fn distinct_hosts<P>(elements: &[Element<P>]) -> Vec<Arc<Host>> {
    let mut hosts: Vec<Arc<Host>> = elements.iter().map(|e| Arc::clone(&e.host)).collect();
    hosts.sort();
    hosts.dedup();
    hosts
}

/// One failed per-host attempt
#[derive(Debug, Clone)]
pub struct HostError {
    pub host: Arc<Host>,
    pub error: String,
}

impl HostError {
    pub fn new(host: Arc<Host>, error: impl Into<String>) -> Self {
        Self {
            host,
            error: error.into(),
        }
    }
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.host.name, self.error)
    }
}

impl Serialize for HostError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("HostError", 2)?;
        s.serialize_field("host", &self.host.name)?;
        s.serialize_field("error", &self.error)?;
        s.end()
    }
}

/// Value returned by a host capability together with its cache provenance
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<T> {
    pub value: T,
    pub cached: bool,
}

impl<T> FetchResult<T> {
    pub fn live(value: T) -> Self {
        Self {
            value,
            cached: false,
        }
    }

    pub fn cached(value: T) -> Self {
        Self {
            value,
            cached: true,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchResult<U> {
        FetchResult {
            value: f(self.value),
            cached: self.cached,
        }
    }
}
