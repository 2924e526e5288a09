//! Progress notification port
//!
//! Defines the interface for reporting progress while a batch fans out.

use fleetlab_domain::Host;

/// Callback for progress updates during a fan-out batch
///
/// Implementations live in the presentation layer. Calls arrive from
/// many tasks at once, so implementations synchronise internally.
pub trait DispatchProgress: Send + Sync {
    /// Called once before any task is spawned
    fn on_dispatch_start(&self, total_tasks: usize);

    /// Called when one host call finishes
    fn on_host_complete(&self, host: &Host, success: bool);

    /// Called after every task has finished, before the conduit closes
    fn on_dispatch_complete(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DispatchProgress for NoProgress {
    fn on_dispatch_start(&self, _total_tasks: usize) {}
    fn on_host_complete(&self, _host: &Host, _success: bool) {}
}
