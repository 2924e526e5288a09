//! Search Users use case
//!
//! Looks a user up on every configured host and groups the matches.

use crate::config::DispatchConfig;
use crate::fanout::{BatchReport, Dispatcher, Limiter};
use crate::ports::host_client::{CacheMode, HostClient};
use crate::ports::progress::{DispatchProgress, NoProgress};
use crate::use_cases::shared::dispatch_user_search;
use fleetlab_domain::{
    AggregateError, GroupOrder, GroupSpec, GroupSpecError, HostRegistry, User, UserField,
    UserQuery,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during a user search
#[derive(Error, Debug)]
pub enum SearchUsersError {
    #[error("Invalid grouping: {0}")]
    GroupSpec(#[from] GroupSpecError),

    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),
}

/// Input for the SearchUsers use case
#[derive(Debug, Clone)]
pub struct SearchUsersInput {
    pub query: UserQuery,
    /// Field to group by; defaults to the search field
    pub group_by: Option<String>,
    pub order: GroupOrder,
    pub cache: CacheMode,
}

impl SearchUsersInput {
    pub fn new(by: UserField, value: impl Into<String>) -> Self {
        Self {
            query: UserQuery::new(by, value),
            group_by: None,
            order: GroupOrder::default(),
            cache: CacheMode::Use,
        }
    }

    pub fn with_order(mut self, order: GroupOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by = Some(field.into());
        self
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    pub fn group_spec(&self) -> GroupSpec {
        let field = self
            .group_by
            .clone()
            .unwrap_or_else(|| self.query.by.as_str().to_string());
        GroupSpec::new(field, self.order)
    }
}

/// Use case for searching a user across all hosts
pub struct SearchUsersUseCase<C: HostClient + 'static> {
    client: Arc<C>,
    registry: HostRegistry,
    dispatch: DispatchConfig,
    progress: Arc<dyn DispatchProgress>,
}

impl<C: HostClient + 'static> SearchUsersUseCase<C> {
    pub fn new(client: Arc<C>, registry: HostRegistry) -> Self {
        Self {
            client,
            registry,
            dispatch: DispatchConfig::default(),
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn DispatchProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Execute the search.
    ///
    /// An empty result is a valid report; whether that is fatal is up to
    /// the caller.
    pub async fn execute(
        &self,
        input: SearchUsersInput,
    ) -> Result<BatchReport<User>, SearchUsersError> {
        let spec = input.group_spec();
        spec.validate::<User>()?;

        info!(
            "Searching for user {:?} by {} on {} hosts",
            input.query.value,
            input.query.by,
            self.registry.len()
        );

        let limiter = Arc::new(Limiter::from_config(&self.dispatch));
        let dispatcher =
            Dispatcher::new(Arc::clone(&limiter)).with_progress(Arc::clone(&self.progress));
        let conduit = dispatch_user_search(
            &dispatcher,
            &self.client,
            &self.registry,
            &input.query,
            input.cache,
        );

        let groups = conduit.aggregate(spec).await?;
        limiter.wait().await;
        let report = BatchReport::new(groups, limiter.errors());

        info!(
            "Search finished: {} groups, {} errors",
            report.found(),
            report.error_count()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::host_client::HostCallError;
    use crate::test_support::{Reply, ScriptedClient, registry};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn bob(id: u64) -> User {
        User::new(id, "bob").with_email("bob@example.com")
    }

    #[tokio::test]
    async fn test_two_hosts_match_one_fails() {
        let client = ScriptedClient::new()
            .reply("A", Reply::Live(vec![bob(1)]))
            .reply("B", Reply::Cached(vec![bob(2)]))
            .reply(
                "C",
                Reply::Fail(HostCallError::Status {
                    code: 404,
                    message: "not found".to_string(),
                }),
            );
        let use_case = SearchUsersUseCase::new(Arc::new(client), registry(&["A", "B", "C"]));

        let report = use_case
            .execute(SearchUsersInput::new(UserField::Username, "bob"))
            .await
            .unwrap();

        assert_eq!(report.found(), 1);
        let group = &report.groups[0];
        assert_eq!(group.key, "bob");
        assert_eq!(group.count(), 2);
        assert_eq!(group.host_names(), vec!["A", "B"]);
        assert_eq!(group.cached_summary().hits(), 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.errors[0].host.name, "C");
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let use_case = SearchUsersUseCase::new(Arc::new(ScriptedClient::new()), registry(&[]));
        let report = tokio::time::timeout(
            Duration::from_secs(1),
            use_case.execute(SearchUsersInput::new(UserField::Email, "bob@example.com")),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.error_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_matches_are_filtered() {
        let client = ScriptedClient::new().reply(
            "A",
            Reply::Live(vec![bob(1), User::new(2, "bobby"), User::new(3, "bob")]),
        );
        let use_case = SearchUsersUseCase::new(Arc::new(client), registry(&["A"]));

        let report = use_case
            .execute(SearchUsersInput::new(UserField::Username, "bob"))
            .await
            .unwrap();

        assert_eq!(report.found(), 1);
        assert_eq!(report.total_elements(), 2);
    }

    #[tokio::test]
    async fn test_every_host_succeeds() {
        let names = ["h1", "h2", "h3", "h4", "h5"];
        let mut client = ScriptedClient::new();
        for (i, name) in names.iter().enumerate() {
            client = client.reply(name, Reply::Live(vec![bob(i as u64), bob(100 + i as u64)]));
        }
        let use_case = SearchUsersUseCase::new(Arc::new(client), registry(&names));

        let report = use_case
            .execute(SearchUsersInput::new(UserField::Email, "BOB@example.com"))
            .await
            .unwrap();

        assert_eq!(report.total_elements(), names.len() * 2);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_email_case_variants_share_a_group() {
        let client = ScriptedClient::new()
            .reply("A", Reply::Live(vec![User::new(1, "bob").with_email("Bob@X.io")]))
            .reply("B", Reply::Live(vec![User::new(2, "bob").with_email("bob@x.io")]));
        let use_case = SearchUsersUseCase::new(Arc::new(client), registry(&["A", "B"]));

        let report = use_case
            .execute(SearchUsersInput::new(UserField::Email, "BOB@x.io"))
            .await
            .unwrap();

        assert_eq!(report.found(), 1);
        assert_eq!(report.groups[0].key, "bob@x.io");
        assert_eq!(report.groups[0].host_names(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_group_by_other_field_sorted_by_count() {
        let client = ScriptedClient::new()
            .reply("A", Reply::Live(vec![bob(1).with_state("blocked")]))
            .reply("B", Reply::Live(vec![bob(2)]))
            .reply("C", Reply::Live(vec![bob(3)]));
        let use_case = SearchUsersUseCase::new(Arc::new(client), registry(&["A", "B", "C"]));

        let report = use_case
            .execute(
                SearchUsersInput::new(UserField::Username, "bob")
                    .with_group_by("state")
                    .with_order(GroupOrder::CountDescending),
            )
            .await
            .unwrap();

        let keys: Vec<_> = report.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["active", "blocked"]);
    }

    #[tokio::test]
    async fn test_unknown_group_field_fails_before_dispatch() {
        let client = Arc::new(ScriptedClient::new().reply("A", Reply::Live(vec![bob(1)])));
        let use_case = SearchUsersUseCase::new(Arc::clone(&client), registry(&["A"]));

        let err = use_case
            .execute(SearchUsersInput::new(UserField::Username, "bob").with_group_by("avatar"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchUsersError::GroupSpec(_)));
        assert!(client.cache_modes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_email_is_reported() {
        let client = ScriptedClient::new().reply("A", Reply::Live(vec![User::new(1, "bob")]));
        let use_case = SearchUsersUseCase::new(Arc::new(client), registry(&["A"]));

        let err = use_case
            .execute(SearchUsersInput::new(UserField::Username, "bob").with_group_by("email"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchUsersError::Aggregate(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_budget_respected() {
        let names: Vec<String> = (0..10).map(|i| format!("h{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let client = Arc::new(ScriptedClient::new().with_delay(Duration::from_millis(10)));
        let use_case = SearchUsersUseCase::new(Arc::clone(&client), registry(&refs))
            .with_dispatch(DispatchConfig::default().with_max_in_flight(2));

        use_case
            .execute(SearchUsersInput::new(UserField::Username, "bob"))
            .await
            .unwrap();

        assert!(client.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(client.cache_modes.lock().unwrap().len(), 10);
    }
}
