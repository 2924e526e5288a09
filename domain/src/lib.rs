//! Domain layer for fleetlab
//!
//! This crate contains the core entities and value objects for running one
//! operation against many GitLab hosts and grouping what comes back.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Host**: one configured GitLab endpoint, shared as `Arc<Host>`
//! - **Element**: one successful per-host result tagged with host and cache flag
//! - **HostError**: one failed per-host attempt
//! - **Group**: elements sharing a grouping-key value, with count and host provenance

pub mod batch;
pub mod config;
pub mod core;
pub mod grouping;
pub mod host;
pub mod user;

// Re-export commonly used types
pub use batch::{Element, FetchResult, HostError};
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use grouping::{
    aggregator::{AggregateError, Aggregator, group_elements},
    field::FieldAccess,
    group::{CacheSummary, Group},
    spec::{GroupOrder, GroupSpec, GroupSpecError},
};
pub use host::{Host, HostRegistry};
pub use user::{User, UserField, UserQuery};
