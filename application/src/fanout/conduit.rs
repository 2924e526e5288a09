//! Result conduit - handoff channel from dispatch tasks to the aggregator

use fleetlab_domain::{AggregateError, Aggregator, Element, FieldAccess, Group, GroupSpec};
use tokio::sync::mpsc;
use tracing::debug;

/// Receiving end of a fan-out batch.
///
/// Closed by the dispatcher's supervisor once every task has finished, so
/// draining until `None` sees every element exactly once.
pub struct Conduit<P> {
    rx: mpsc::UnboundedReceiver<Element<P>>,
}

impl<P> Conduit<P> {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Element<P>>) -> Self {
        Self { rx }
    }

    /// Drain every element in arrival order
    pub async fn collect(mut self) -> Vec<Element<P>> {
        let mut elements = Vec::new();
        while let Some(element) = self.rx.recv().await {
            elements.push(element);
        }
        elements
    }
}

impl<P: FieldAccess> Conduit<P> {
    /// Drain the conduit into groups.
    ///
    /// Stops at the first element missing the grouping field.
    pub async fn aggregate(mut self, spec: GroupSpec) -> Result<Vec<Group<P>>, AggregateError> {
        let mut aggregator = Aggregator::new(spec);
        while let Some(element) = self.rx.recv().await {
            aggregator.push(element)?;
        }
        debug!(elements = aggregator.total(), "Aggregated batch");
        Ok(aggregator.finish())
    }
}
