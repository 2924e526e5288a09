//! Host client port
//!
//! Defines the interface for talking to one GitLab host.

use async_trait::async_trait;
use fleetlab_domain::{FetchResult, Host, User, UserQuery};
use thiserror::Error;

/// Errors from a single host call.
///
/// These are recorded per host by the limiter and never abort a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostCallError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("more than {pages} pages of results; narrow the query")]
    TooManyPages { pages: u32 },

    #[error("{0}")]
    Other(String),
}

impl HostCallError {
    /// Check if the host answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, HostCallError::Status { code: 404, .. })
    }
}

/// Whether a read may be answered from the response cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Use,
    Bypass,
}

impl CacheMode {
    pub fn from_no_cache(no_cache: bool) -> Self {
        if no_cache {
            CacheMode::Bypass
        } else {
            CacheMode::Use
        }
    }
}

/// Client for one configured host.
///
/// Implementations (adapters) live in the infrastructure layer. A single
/// client serves every host of the registry; the host is passed per call.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Search users on `host`, optionally served from cache
    async fn search_users(
        &self,
        host: &Host,
        query: &UserQuery,
        cache: CacheMode,
    ) -> Result<FetchResult<Vec<User>>, HostCallError>;

    /// Block a user by id. Always a live call.
    async fn block_user(&self, host: &Host, user_id: u64) -> Result<(), HostCallError>;
}
