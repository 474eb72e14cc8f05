//! Asset resolution core
//!
//! Given a request path, determine the current content version, compose the
//! backend key, fetch the object and attach the cache directive for it.
//! This module never logs; failures are returned to the hosting layer.

mod error;
mod path;
mod policy;
mod version;

#[cfg(test)]
pub(crate) mod testing;

use hyper::body::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::storage::{StorageBackend, StorageError};

pub use error::ResolveError;
pub use path::PathComposer;
pub use policy::{CacheDirective, CachePolicy, CacheRule, ONE_DAY, ONE_HOUR, ONE_WEEK};
pub use version::VersionResolver;

/// Immutable settings fixed at construction
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Literal prefix every request path must carry, e.g. `/docs/`
    pub route_prefix: String,
    /// Key prefix inside the backend, may be empty
    pub root: String,
    /// Appended to request paths ending in `/`
    pub index_file: Option<String>,
    /// Name of the version marker object under `root`
    pub version_key: String,
    /// Deadline applied by `resolve` to both backend calls together
    pub backend_timeout: Duration,
    /// Version memo lifetime, zero for none
    pub version_ttl: Duration,
    pub cache_policy: CachePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            route_prefix: "/docs/".to_string(),
            root: String::new(),
            index_file: Some("index.html".to_string()),
            version_key: "VERSION".to_string(),
            backend_timeout: Duration::from_secs(10),
            version_ttl: Duration::ZERO,
            cache_policy: CachePolicy::default(),
        }
    }
}

/// A fetched object ready to be written to the response
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub content: Bytes,
    pub cache_directive: CacheDirective,
    /// Backend key the content was read from
    pub key: String,
    pub version: String,
}

/// Orchestrates version lookup, key composition, fetch and cache policy
pub struct AssetResolver {
    backend: Arc<dyn StorageBackend>,
    versions: VersionResolver,
    composer: PathComposer,
    policy: CachePolicy,
    timeout: Duration,
}

impl AssetResolver {
    pub fn new(config: ResolverConfig, backend: Arc<dyn StorageBackend>) -> Self {
        let composer = PathComposer::new(
            &config.route_prefix,
            &config.root,
            config.index_file.as_deref(),
        );
        let versions = VersionResolver::new(
            Arc::clone(&backend),
            composer.root_key(&config.version_key),
        )
        .with_ttl(config.version_ttl);

        Self {
            backend,
            versions,
            composer,
            policy: config.cache_policy,
            timeout: config.backend_timeout,
        }
    }

    pub const fn versions(&self) -> &VersionResolver {
        &self.versions
    }

    pub const fn composer(&self) -> &PathComposer {
        &self.composer
    }

    /// Current version, bounded by the configured backend timeout
    pub async fn current_version(&self) -> Result<String, ResolveError> {
        tokio::time::timeout(self.timeout, self.versions.current_version())
            .await
            .map_err(|_| ResolveError::Timeout(self.timeout))?
    }

    /// Resolve `request_path` within the configured backend timeout
    pub async fn resolve(&self, request_path: &str) -> Result<ResolvedAsset, ResolveError> {
        self.resolve_with_deadline(request_path, Instant::now() + self.timeout)
            .await
    }

    /// Resolve `request_path`, giving up once `deadline` passes
    ///
    /// The deadline covers the version read and the content fetch together.
    /// Dropping the returned future cancels any backend call in flight.
    pub async fn resolve_with_deadline(
        &self,
        request_path: &str,
        deadline: Instant,
    ) -> Result<ResolvedAsset, ResolveError> {
        // Reject before touching the backend
        self.composer.relative_path(request_path)?;

        let budget = deadline.saturating_duration_since(Instant::now());
        tokio::time::timeout_at(deadline, self.resolve_unbounded(request_path))
            .await
            .map_err(|_| ResolveError::Timeout(budget))?
    }

    async fn resolve_unbounded(&self, request_path: &str) -> Result<ResolvedAsset, ResolveError> {
        let version = self.versions.current_version().await?;
        let key = self.composer.compose(&version, request_path)?;

        let content = self.backend.fetch(&key).await.map_err(|e| match e {
            StorageError::NotFound { key } => ResolveError::AssetNotFound { key },
            StorageError::InvalidKey { reason, .. } => {
                ResolveError::invalid_path(request_path, reason)
            }
            StorageError::Unavailable(_) => ResolveError::BackendUnavailable(e),
        })?;

        let cache_directive = self.policy.directive_for(&key);
        Ok(ResolvedAsset {
            content,
            cache_directive,
            key,
            version,
        })
    }
}
