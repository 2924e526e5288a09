//! Block Users use case
//!
//! Two batches: find every account matching the query (cache bypassed),
//! then block each one. Blocks are mutating calls and run one at a time
//! under the batch's mutation lock.

use crate::config::DispatchConfig;
use crate::fanout::{BatchReport, CallMode, Dispatcher, Limiter};
use crate::ports::host_client::{CacheMode, HostCallError, HostClient};
use crate::ports::progress::{DispatchProgress, NoProgress};
use crate::use_cases::shared::dispatch_user_search;
use fleetlab_domain::{
    AggregateError, Element, FetchResult, GroupSpec, GroupSpecError, Host, HostError,
    HostRegistry, User, UserField, UserQuery, batch::distinct_hosts,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while blocking users
#[derive(Error, Debug)]
pub enum BlockUsersError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("Invalid grouping: {0}")]
    GroupSpec(#[from] GroupSpecError),

    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),
}

/// Input for the BlockUsers use case
#[derive(Debug, Clone)]
pub struct BlockUsersInput {
    pub query: UserQuery,
}

impl BlockUsersInput {
    pub fn new(by: UserField, value: impl Into<String>) -> Self {
        Self {
            query: UserQuery::new(by, value),
        }
    }

    /// Results are grouped by the field the user was searched by
    pub fn group_spec(&self) -> GroupSpec {
        GroupSpec::by_key(self.query.by.as_str())
    }
}

/// Accounts found by the lookup batch, awaiting confirmation
#[derive(Debug, Clone)]
pub struct BlockTargets {
    pub query: UserQuery,
    pub elements: Vec<Element<User>>,
    /// Hosts that failed during lookup
    pub errors: Vec<HostError>,
}

impl BlockTargets {
    /// Distinct hosts the user exists on, sorted by name
    pub fn hosts(&self) -> Vec<Arc<Host>> {
        distinct_hosts(&self.elements)
    }

    pub fn host_names(&self) -> Vec<String> {
        self.hosts().iter().map(|h| h.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Use case for blocking a user on every host it exists on
pub struct BlockUsersUseCase<C: HostClient + 'static> {
    client: Arc<C>,
    registry: HostRegistry,
    dispatch: DispatchConfig,
    lookup_progress: Arc<dyn DispatchProgress>,
    block_progress: Arc<dyn DispatchProgress>,
}

impl<C: HostClient + 'static> BlockUsersUseCase<C> {
    pub fn new(client: Arc<C>, registry: HostRegistry) -> Self {
        Self {
            client,
            registry,
            dispatch: DispatchConfig::default(),
            lookup_progress: Arc::new(NoProgress),
            block_progress: Arc::new(NoProgress),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Progress for the lookup batch
    pub fn with_lookup_progress(mut self, progress: Arc<dyn DispatchProgress>) -> Self {
        self.lookup_progress = progress;
        self
    }

    /// Progress for the block batch
    pub fn with_block_progress(mut self, progress: Arc<dyn DispatchProgress>) -> Self {
        self.block_progress = progress;
        self
    }

    /// Look the user up on every host, bypassing the cache.
    ///
    /// Finding nobody is an error here: there is nothing to block.
    pub async fn find_targets(
        &self,
        input: &BlockUsersInput,
    ) -> Result<BlockTargets, BlockUsersError> {
        input.group_spec().validate::<User>()?;

        info!(
            "Searching for user {:?} by {} on {} hosts",
            input.query.value,
            input.query.by,
            self.registry.len()
        );

        let limiter = Arc::new(Limiter::from_config(&self.dispatch));
        let dispatcher =
            Dispatcher::new(Arc::clone(&limiter)).with_progress(Arc::clone(&self.lookup_progress));
        let elements = dispatch_user_search(
            &dispatcher,
            &self.client,
            &self.registry,
            &input.query,
            CacheMode::Bypass,
        )
        .collect()
        .await;
        limiter.wait().await;

        if elements.is_empty() {
            return Err(BlockUsersError::UserNotFound(input.query.value.clone()));
        }

        Ok(BlockTargets {
            query: input.query.clone(),
            elements,
            errors: limiter.errors(),
        })
    }

    /// Block every target account.
    ///
    /// Each blocked account comes back as a live element with state
    /// `blocked`. Lookup errors are carried in front of block errors.
    pub async fn block(&self, targets: BlockTargets) -> Result<BatchReport<User>, BlockUsersError> {
        let spec = GroupSpec::by_key(targets.query.by.as_str());
        spec.validate::<User>()?;

        info!(
            "Blocking user {:?} on {} hosts",
            targets.query.value,
            targets.hosts().len()
        );

        let limiter = Arc::new(Limiter::from_config(&self.dispatch));
        let dispatcher =
            Dispatcher::new(Arc::clone(&limiter)).with_progress(Arc::clone(&self.block_progress));
        let jobs = targets
            .elements
            .into_iter()
            .map(|e| (e.host, e.payload))
            .collect();
        let client = Arc::clone(&self.client);

        let conduit = dispatcher.dispatch(jobs, CallMode::Mutating, move |host, user: User| {
            let client = Arc::clone(&client);
            async move {
                // The account can disappear between lookup and block.
                client.block_user(&host, user.id).await.map_err(|e| {
                    if e.is_not_found() {
                        HostCallError::Other(format!("user {} not found on host", user.username))
                    } else {
                        e
                    }
                })?;
                Ok::<_, HostCallError>(FetchResult::live(vec![user.with_state("blocked")]))
            }
        });

        let groups = conduit.aggregate(spec).await?;
        limiter.wait().await;
        let report = BatchReport::new(groups, limiter.errors()).with_prior_errors(targets.errors);

        info!(
            "Block finished: {} blocked, {} errors",
            report.total_elements(),
            report.error_count()
        );
        Ok(report)
    }
}
