//! Cross-host grouping.
//!
//! - [`field::FieldAccess`] - named-field lookup implemented per payload type
//! - [`spec::GroupSpec`] - grouping field and output order
//! - [`aggregator::Aggregator`] - builds ordered [`group::Group`]s from elements

pub mod aggregator;
pub mod field;
pub mod group;
pub mod spec;
