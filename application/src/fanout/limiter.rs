//! Limiter - per-batch concurrency gate, completion tracker and error sink.
//!
//! One [`Limiter`] is built for each batch and shared with every dispatched
//! task through an `Arc`. It provides:
//!
//! - a completion barrier: [`Limiter::add`] registers a task and returns a
//!   [`Completion`] guard whose drop marks the task done, on every exit path;
//! - [`Limiter::wait`], which resolves once every registered task is done;
//! - an optional in-flight budget ([`Limiter::acquire`]);
//! - a single coarse mutation lock ([`Limiter::lock`]) that serialises
//!   mutating host calls across the whole batch;
//! - an append-only [`HostError`] list safe for concurrent writers.

use crate::config::DispatchConfig;
use fleetlab_domain::{Host, HostError};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{MutexGuard, OwnedSemaphorePermit, Semaphore, watch};
use tracing::trace;

/// Shared batch context
pub struct Limiter {
    budget: Option<Arc<Semaphore>>,
    pending: watch::Sender<usize>,
    mutation: tokio::sync::Mutex<()>,
    errors: Mutex<Vec<HostError>>,
}

impl Limiter {
    /// Create a limiter with an optional in-flight budget (`0` = unbounded)
    pub fn new(max_in_flight: Option<usize>) -> Self {
        let max_in_flight = max_in_flight.filter(|n| *n > 0);
        let (pending, _) = watch::channel(0);
        Self {
            budget: max_in_flight.map(|n| Arc::new(Semaphore::new(n))),
            pending,
            mutation: tokio::sync::Mutex::new(()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(config.budget())
    }

    /// Register one pending task.
    ///
    /// Call this before spawning the task so that [`wait`](Self::wait) can
    /// never observe a zero count while work is still being handed out.
    #[must_use = "dropping the completion immediately marks the task done"]
    pub fn add(self: &Arc<Self>) -> Completion {
        self.pending.send_modify(|n| *n += 1);
        Completion {
            limiter: Arc::clone(self),
        }
    }

    fn done(&self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Number of registered tasks that have not finished yet
    pub fn in_flight(&self) -> usize {
        *self.pending.borrow()
    }

    /// Resolve once every registered task has finished.
    ///
    /// Returns immediately when nothing is pending.
    pub async fn wait(&self) {
        let mut rx = self.pending.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|n| *n == 0).await;
        trace!("Limiter drained");
    }

    /// Take a slot from the in-flight budget.
    ///
    /// Returns `None` when the limiter is unbounded. The permit is released
    /// when dropped.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        let budget = self.budget.as_ref()?;
        Arc::clone(budget).acquire_owned().await.ok()
    }

    /// Acquire the batch-wide mutation lock.
    ///
    /// Held around mutating host calls only; reads never take it.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().await
    }

    /// Record a failed host call
    pub fn error(&self, host: Arc<Host>, err: impl std::fmt::Display) {
        let entry = HostError::new(host, err.to_string());
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Snapshot of the recorded errors; complete only after [`wait`](Self::wait)
    pub fn errors(&self) -> Vec<HostError> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn error_count(&self) -> usize {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}


/// Marks one registered task done when dropped
#[must_use = "dropping the completion immediately marks the task done"]
pub struct Completion {
    limiter: Arc<Limiter>,
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.limiter.done();
    }
}
