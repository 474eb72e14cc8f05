//! Current content version lookup
//!
//! The version marker is re-read on every call unless a TTL is configured, in
//! which case the last good value is reused until it expires or is invalidated.

use hyper::header::HeaderValue;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::error::ResolveError;
use crate::storage::{StorageBackend, StorageError};

/// Memoized version value with a hard expiry
#[derive(Debug)]
struct VersionCache {
    ttl: Duration,
    entry: RwLock<Option<(String, Instant)>>,
}

impl VersionCache {
    async fn get(&self) -> Option<String> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|(_, fetched_at)| fetched_at.elapsed() < self.ttl)
            .map(|(version, _)| version.clone())
    }

    async fn store(&self, version: &str) {
        *self.entry.write().await = Some((version.to_string(), Instant::now()));
    }

    async fn clear(&self) {
        *self.entry.write().await = None;
    }
}

/// Reads the version marker from the backend
pub struct VersionResolver {
    backend: Arc<dyn StorageBackend>,
    key: String,
    cache: Option<VersionCache>,
}

impl VersionResolver {
    /// Resolver that re-reads `key` on every call
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            cache: None,
        }
    }

    /// Reuse a fetched version for at most `ttl`. A zero TTL disables the memo.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = (!ttl.is_zero()).then(|| VersionCache {
            ttl,
            entry: RwLock::new(None),
        });
        self
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.cache.as_ref().map(|c| c.ttl)
    }

    /// Current version, trimmed of surrounding whitespace
    pub async fn current_version(&self) -> Result<String, ResolveError> {
        if let Some(cache) = &self.cache {
            if let Some(version) = cache.get().await {
                return Ok(version);
            }
        }

        let raw = self
            .backend
            .fetch_version(&self.key)
            .await
            .map_err(|e| match e {
                StorageError::NotFound { .. } | StorageError::InvalidKey { .. } => {
                    ResolveError::VersionNotFound {
                        key: self.key.clone(),
                    }
                }
                StorageError::Unavailable(_) => ResolveError::BackendUnavailable(e),
            })?;

        // The version is echoed in response headers
        let version = raw.trim();
        if version.is_empty() || HeaderValue::from_str(version).is_err() {
            return Err(ResolveError::VersionNotFound {
                key: self.key.clone(),
            });
        }

        if let Some(cache) = &self.cache {
            cache.store(version).await;
        }
        Ok(version.to_string())
    }

    /// Drop any memoized version so the next call reads the backend
    pub async fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }
}
