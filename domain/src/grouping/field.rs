//! Named-field access on opaque payloads

/// Read a payload field by name as a string.
///
/// This is the only thing the aggregator knows about a payload's shape.
/// Implementations list every name they answer to in [`FIELDS`](FieldAccess::FIELDS)
/// so a grouping key can be validated before any host is contacted.
pub trait FieldAccess {
    /// Field names this payload type can be grouped by
    const FIELDS: &'static [&'static str];

    /// Value of the named field, or `None` if this record does not carry it
    fn field(&self, name: &str) -> Option<String>;

    /// Check whether `name` is a groupable field of this type
    fn has_field(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }
}
