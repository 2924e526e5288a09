//! Scripted host client and fixtures shared by unit tests

use crate::ports::host_client::{CacheMode, HostCallError, HostClient};
use crate::ports::progress::DispatchProgress;
use async_trait::async_trait;
use fleetlab_domain::{FetchResult, Host, HostRegistry, User, UserQuery};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) fn host(name: &str) -> Arc<Host> {
    Host::new(name, format!("https://{}.example.com", name), "token").shared()
}

pub(crate) fn registry(names: &[&str]) -> HostRegistry {
    HostRegistry::new(
        names
            .iter()
            .map(|n| Host::new(*n, format!("https://{}.example.com", n), "token"))
            .collect(),
    )
    .unwrap()
}

pub(crate) enum Reply {
    Live(Vec<User>),
    Cached(Vec<User>),
    Fail(HostCallError),
}

/// In-memory client answering per host name, with live-call instrumentation
#[derive(Default)]
pub(crate) struct ScriptedClient {
    replies: HashMap<String, Reply>,
    block_failures: HashMap<String, u16>,
    delay: Duration,
    live: AtomicUsize,
    pub peak: AtomicUsize,
    blocking: AtomicUsize,
    pub block_peak: AtomicUsize,
    pub blocked: Mutex<Vec<(String, u64)>>,
    pub cache_modes: Mutex<Vec<CacheMode>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, host: &str, reply: Reply) -> Self {
        self.replies.insert(host.to_string(), reply);
        self
    }

    /// Answer block calls on `host` with this HTTP status
    pub fn fail_block(mut self, host: &str, code: u16) -> Self {
        self.block_failures.insert(host.to_string(), code);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl HostClient for ScriptedClient {
    async fn search_users(
        &self,
        host: &Host,
        _query: &UserQuery,
        cache: CacheMode,
    ) -> Result<FetchResult<Vec<User>>, HostCallError> {
        self.cache_modes.lock().unwrap().push(cache);
        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.live.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(&host.name) {
            Some(Reply::Live(users)) => Ok(FetchResult::live(users.clone())),
            Some(Reply::Cached(users)) if cache == CacheMode::Use => {
                Ok(FetchResult::cached(users.clone()))
            }
            Some(Reply::Cached(users)) => Ok(FetchResult::live(users.clone())),
            Some(Reply::Fail(e)) => Err(e.clone()),
            None => Ok(FetchResult::live(vec![])),
        }
    }

    async fn block_user(&self, host: &Host, user_id: u64) -> Result<(), HostCallError> {
        let now = self.blocking.fetch_add(1, Ordering::SeqCst) + 1;
        self.block_peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.blocking.fetch_sub(1, Ordering::SeqCst);

        if let Some(code) = self.block_failures.get(&host.name) {
            return Err(HostCallError::Status {
                code: *code,
                message: format!("{} refused", code),
            });
        }
        self.blocked
            .lock()
            .unwrap()
            .push((host.name.clone(), user_id));
        Ok(())
    }
}

/// Progress sink that records the size of every batch it sees
#[derive(Default)]
pub(crate) struct RecordingProgress {
    pub starts: Mutex<Vec<usize>>,
}

impl DispatchProgress for RecordingProgress {
    fn on_dispatch_start(&self, total_tasks: usize) {
        self.starts.lock().unwrap().push(total_tasks);
    }

    fn on_host_complete(&self, _host: &Host, _success: bool) {}
}
