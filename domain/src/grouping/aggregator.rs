//! Dynamic-key grouping over heterogeneous per-host results.
//!
//! [`Aggregator`] accepts elements in any order, groups them by the
//! configured payload field, and hands back groups in an order that depends
//! only on the [`GroupSpec`] and the input multiset, never on arrival order.

use super::field::FieldAccess;
use super::group::Group;
use super::spec::{GroupOrder, GroupSpec};
use crate::batch::Element;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("result from host '{host}' has no field '{field}'")]
    MissingField { host: String, field: String },
}

/// Incremental grouping state
#[derive(Debug)]
pub struct Aggregator<P> {
    spec: GroupSpec,
    groups: Vec<Group<P>>,
    index: HashMap<String, usize>,
    total: usize,
}

impl<P: FieldAccess> Aggregator<P> {
    pub fn new(spec: GroupSpec) -> Self {
        Self {
            spec,
            groups: Vec::new(),
            index: HashMap::new(),
            total: 0,
        }
    }

    /// Number of elements accepted so far
    pub fn total(&self) -> usize {
        self.total
    }

    /// Place one element into its group.
    ///
    /// A payload without the configured field is rejected rather than
    /// grouped under an empty key.
    pub fn push(&mut self, element: Element<P>) -> Result<(), AggregateError> {
        let key = element
            .payload
            .field(&self.spec.field)
            .ok_or_else(|| AggregateError::MissingField {
                host: element.host.name.clone(),
                field: self.spec.field.clone(),
            })?;

        match self.index.get(&key) {
            Some(&i) => self.groups[i].push(element),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(Group::new(key, element));
            }
        }
        self.total += 1;
        Ok(())
    }

    /// Materialise the groups in the configured order.
    ///
    /// Keys are unique, so sorting on the key (alone or as the count
    /// tiebreak) gives a total order.
    pub fn finish(self) -> Vec<Group<P>> {
        let mut groups = self.groups;
        match self.spec.order {
            GroupOrder::KeyAscending => groups.sort_by(|a, b| a.key.cmp(&b.key)),
            GroupOrder::CountDescending => groups.sort_by(|a, b| {
                b.count().cmp(&a.count()).then_with(|| a.key.cmp(&b.key))
            }),
        }
        groups
    }
}

/// Group a finite sequence of elements in one call
pub fn group_elements<P, I>(spec: GroupSpec, elements: I) -> Result<Vec<Group<P>>, AggregateError>
where
    P: FieldAccess,
    I: IntoIterator<Item = Element<P>>,
{
    let mut aggregator = Aggregator::new(spec);
    for element in elements {
        aggregator.push(element)?;
    }
    Ok(aggregator.finish())
}
