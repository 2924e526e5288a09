//! On-disk response cache
//!
//! One JSON file per (host, query) key under the cache directory. Entries
//! carry their write time and expire after the configured TTL. Cache
//! failures never fail a host call: reads degrade to a miss and writes are
//! skipped with a warning.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache entry expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    stored_at: DateTime<Utc>,
    body: serde_json::Value,
}

/// File-backed cache of decoded API responses
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    fn entry_path(&self, host: &str, key: &str) -> PathBuf {
        self.dir
            .join(file_safe(host))
            .join(format!("{}.json", file_safe(key)))
    }

    /// Cached value for `key` on `host`, if present and fresh
    pub async fn get<T: DeserializeOwned>(&self, host: &str, key: &str) -> Option<T> {
        match self.read(host, key).await {
            Ok(value) => {
                debug!(host, key, "Cache hit");
                Some(value)
            }
            Err(CacheError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!(host, key, "Cache miss: {}", e);
                None
            }
        }
    }

    async fn read<T: DeserializeOwned>(&self, host: &str, key: &str) -> Result<T, CacheError> {
        let raw = tokio::fs::read(self.entry_path(host, key)).await?;
        let entry: CacheEntry = serde_json::from_slice(&raw)?;

        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        if Utc::now().signed_duration_since(entry.stored_at) >= ttl {
            return Err(CacheError::Expired);
        }
        Ok(serde_json::from_value(entry.body)?)
    }

    /// Store `value` for `key` on `host`
    pub async fn put<T: Serialize>(&self, host: &str, key: &str, value: &T) {
        if let Err(e) = self.write(host, key, value).await {
            warn!(host, key, "Failed to write cache entry: {}", e);
        }
    }

    async fn write<T: Serialize>(&self, host: &str, key: &str, value: &T) -> Result<(), CacheError> {
        let path = self.entry_path(host, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let entry = CacheEntry {
            stored_at: Utc::now(),
            body: serde_json::to_value(value)?,
        };
        tokio::fs::write(&path, serde_json::to_vec(&entry)?).await?;
        Ok(())
    }
}

/// Map an arbitrary string to a unique, filesystem-safe name
fn file_safe(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, byte) in s.bytes().enumerate() {
        match byte {
            // A leading dot would allow `..` and hidden files.
            b'.' if i > 0 => out.push('.'),
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' => out.push(byte as char),
            _ => out.push_str(&format!("_{:02x}", byte)),
        }
    }
    out
}
