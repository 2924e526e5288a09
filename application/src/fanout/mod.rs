//! Bounded fan-out engine.
//!
//! - [`limiter::Limiter`] - per-batch concurrency gate, completion barrier and error sink
//! - [`dispatcher::Dispatcher`] - one task per host, gated by the limiter
//! - [`conduit::Conduit`] - channel closed only after every task finished
//! - [`report::BatchReport`] - ordered groups plus host errors

pub mod conduit;
pub mod dispatcher;
pub mod limiter;
pub mod report;

pub use conduit::Conduit;
pub use dispatcher::{CallMode, Dispatcher};
pub use limiter::{Completion, Limiter};
pub use report::{BatchReport, GroupSummary, ReportSummary};
