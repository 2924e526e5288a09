//! Shared utilities for use cases.
//!
//! Contains the user-search fan-out used by both the search and block
//! use cases.

use crate::fanout::{CallMode, Conduit, Dispatcher};
use crate::ports::host_client::{CacheMode, HostCallError, HostClient};
use fleetlab_domain::{HostRegistry, User, UserQuery};
use std::sync::Arc;

/// Fan out a user search to every host in `registry`.
///
/// Each host's answer is narrowed to exact matches on the search field,
/// since the GitLab `search` parameter also returns partial matches.
pub(crate) fn dispatch_user_search<C: HostClient + 'static>(
    dispatcher: &Dispatcher,
    client: &Arc<C>,
    registry: &HostRegistry,
    query: &UserQuery,
    cache: CacheMode,
) -> Conduit<User> {
    let jobs = registry
        .hosts()
        .iter()
        .map(|h| (Arc::clone(h), ()))
        .collect();
    let client = Arc::clone(client);
    let query = query.clone();

    dispatcher.dispatch(jobs, CallMode::Read, move |host, ()| {
        let client = Arc::clone(&client);
        let query = query.clone();
        async move {
            let fetched = client.search_users(&host, &query, cache).await?;
            Ok::<_, HostCallError>(fetched.map(|users| {
                users
                    .into_iter()
                    .filter(|u| u.matches(query.by, &query.value))
                    .collect()
            }))
        }
    })
}
