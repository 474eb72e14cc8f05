//! Storage backend module
//!
//! Defines the `StorageBackend` capability the resolver reads from, and the two
//! concrete backends: a local directory for development and a remote object
//! store for production. The backend is chosen once at startup.

mod local;
mod remote;

use async_trait::async_trait;
use hyper::body::Bytes;
use percent_encoding::percent_decode_str;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageConfig, StorageKind};

pub use local::LocalFilesystemBackend;
pub use remote::RemoteObjectStoreBackend;

/// Errors reported by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object does not exist in the store
    #[error("object '{key}' not found")]
    NotFound { key: String },

    /// The key cannot be expressed for this backend, or names an unusable object
    #[error("invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Transport, I/O or upstream failure
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    pub fn invalid_key(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Read-only access to versioned assets
///
/// Implementations must be safe for concurrent use; the resolver shares a
/// single instance across all in-flight requests.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Fetch the raw bytes stored under `key`
    async fn fetch(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Fetch a small text object (the version marker) stored under `key`
    async fn fetch_version(&self, key: &str) -> Result<String, StorageError> {
        let bytes = self.fetch(key).await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| StorageError::invalid_key(key, format!("content is not UTF-8: {e}")))
    }

    /// Short label for startup logs
    fn describe(&self) -> String;
}

/// Build the backend selected by configuration
pub fn build_backend(config: &StorageConfig) -> Result<Arc<dyn StorageBackend>, String> {
    match config.backend {
        StorageKind::Local => Ok(Arc::new(LocalFilesystemBackend::new(&config.local_dir))),
        StorageKind::Remote => {
            let base_url = config
                .base_url
                .as_deref()
                .ok_or_else(|| "storage.base_url is required for the remote backend".to_string())?;
            Ok(Arc::new(RemoteObjectStoreBackend::new(base_url)?))
        }
    }
}

/// Split a key into segments, rejecting anything that could leave the store root
pub(crate) fn checked_segments(key: &str) -> Result<Vec<&str>, StorageError> {
    let mut segments = Vec::new();
    for segment in key.split('/') {
        match segment {
            "" | "." => {}
            s => {
                if let Some(reason) = segment_violation(s) {
                    return Err(StorageError::invalid_key(key, reason));
                }
                segments.push(s);
            }
        }
    }
    if segments.is_empty() {
        return Err(StorageError::invalid_key(key, "empty key"));
    }
    Ok(segments)
}

/// Reason a single path segment is unsafe, checked after percent-decoding
///
/// Catches `..`, `%2e%2e` and segments hiding a separator or NUL such as
/// `..%2f..` or `a%5cb`.
pub(crate) fn segment_violation(segment: &str) -> Option<&'static str> {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    if decoded == ".." {
        Some("parent directory segment")
    } else if decoded.contains(['/', '\\', '\0']) {
        Some("illegal character")
    } else {
        None
    }
}
