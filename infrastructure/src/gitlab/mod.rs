//! GitLab adapter: REST client plus on-disk response cache

pub mod cache;
pub mod client;

pub use cache::{CacheError, ResponseCache};
pub use client::GitLabClient;
