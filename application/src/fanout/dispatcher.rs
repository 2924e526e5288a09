//! Fan-out dispatcher
//!
//! Starts one task per job, gates it through the batch [`Limiter`], and
//! forwards successful results into a [`Conduit`]. A supervising task waits
//! for the limiter to drain and only then drops the last sender, so the
//! conduit closes exactly once, after every task has finished.

use super::conduit::Conduit;
use super::limiter::Limiter;
use crate::ports::host_client::HostCallError;
use crate::ports::progress::{DispatchProgress, NoProgress};
use fleetlab_domain::{Element, FetchResult, Host};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Whether a host call changes remote state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// Lookups run fully in parallel
    Read,
    /// Mutations run one at a time under the limiter's lock
    Mutating,
}

/// Spawns host calls for one batch
pub struct Dispatcher {
    limiter: Arc<Limiter>,
    progress: Arc<dyn DispatchProgress>,
}

impl Dispatcher {
    pub fn new(limiter: Arc<Limiter>) -> Self {
        Self {
            limiter,
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn DispatchProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn limiter(&self) -> &Arc<Limiter> {
        &self.limiter
    }

    /// Dispatch one call per `(host, job)` pair.
    ///
    /// Each successful call emits one [`Element`] per returned payload; a
    /// failed or panicking call is recorded on the limiter instead. Must be
    /// called from within a tokio runtime.
    pub fn dispatch<J, P, F, Fut>(
        &self,
        jobs: Vec<(Arc<Host>, J)>,
        mode: CallMode,
        call: F,
    ) -> Conduit<P>
    where
        J: Send + 'static,
        P: Send + 'static,
        F: Fn(Arc<Host>, J) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<FetchResult<Vec<P>>, HostCallError>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let call = Arc::new(call);

        debug!(tasks = jobs.len(), ?mode, "Dispatching fan-out batch");
        self.progress.on_dispatch_start(jobs.len());

        for (host, job) in jobs {
            // Registered before the spawn, never inside the task.
            let completion = self.limiter.add();
            let limiter = Arc::clone(&self.limiter);
            let progress = Arc::clone(&self.progress);
            let call = Arc::clone(&call);
            let tx = tx.clone();

            tokio::spawn(async move {
                let _completion = completion;
                let _permit = limiter.acquire().await;

                let outcome = {
                    let _mutation = match mode {
                        CallMode::Mutating => Some(limiter.lock().await),
                        CallMode::Read => None,
                    };
                    let host = Arc::clone(&host);
                    AssertUnwindSafe(async move { call(host, job).await })
                        .catch_unwind()
                        .await
                };

                match outcome {
                    Ok(Ok(fetched)) => {
                        debug!(host = %host, cached = fetched.cached, "Host call succeeded");
                        for payload in fetched.value {
                            // The receiver may already be gone if aggregation failed.
                            let _ = tx.send(Element::new(Arc::clone(&host), payload, fetched.cached));
                        }
                        progress.on_host_complete(&host, true);
                    }
                    Ok(Err(e)) => {
                        warn!("Host {} failed: {}", host, e);
                        limiter.error(Arc::clone(&host), &e);
                        progress.on_host_complete(&host, false);
                    }
                    Err(_) => {
                        warn!("Host {} call panicked", host);
                        limiter.error(Arc::clone(&host), "host call panicked");
                        progress.on_host_complete(&host, false);
                    }
                }
            });
        }

        let limiter = Arc::clone(&self.limiter);
        let progress = Arc::clone(&self.progress);
        tokio::spawn(async move {
            limiter.wait().await;
            progress.on_dispatch_complete();
            drop(tx);
            debug!("Conduit closed");
        });

        Conduit::new(rx)
    }
}
