//! Resolution error kinds

use std::time::Duration;
use thiserror::Error;

use crate::storage::StorageError;

/// Every way a resolution can fail. Exactly one kind is reported per call.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Request path is malformed, lacks the route prefix, or escapes the root
    #[error("invalid request path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The version marker is missing (or empty) in the backend
    #[error("version marker '{key}' not found")]
    VersionNotFound { key: String },

    /// The requested object does not exist at the resolved version
    #[error("asset '{key}' not found")]
    AssetNotFound { key: String },

    /// Transport or connectivity failure talking to the backend
    #[error(transparent)]
    BackendUnavailable(StorageError),

    /// The caller's deadline passed before the backend answered
    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),
}

impl ResolveError {
    pub fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status the hosting layer answers with
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPath { .. } => 400,
            Self::AssetNotFound { .. } => 404,
            Self::VersionNotFound { .. } => 500,
            Self::BackendUnavailable(_) => 502,
            Self::Timeout(_) => 504,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ResolveError::invalid_path("/x", "bad").status_code(), 400);
        assert_eq!(
            ResolveError::AssetNotFound { key: "k".into() }.status_code(),
            404
        );
        assert_eq!(
            ResolveError::VersionNotFound { key: "VERSION".into() }.status_code(),
            500
        );
        assert_eq!(
            ResolveError::BackendUnavailable(StorageError::Unavailable("down".into()))
                .status_code(),
            502
        );
        assert_eq!(
            ResolveError::Timeout(Duration::from_secs(1)).status_code(),
            504
        );
    }

    #[test]
    fn test_display() {
        let err = ResolveError::invalid_path("/etc/passwd", "missing route prefix '/docs/'");
        assert_eq!(
            err.to_string(),
            "invalid request path '/etc/passwd': missing route prefix '/docs/'"
        );
    }
}
