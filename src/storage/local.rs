//! Local filesystem backend
//!
//! Serves objects from a directory on disk. Used for development, where the
//! directory mirrors the bucket layout (`VERSION` plus one folder per version).

use async_trait::async_trait;
use hyper::body::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{checked_segments, StorageBackend, StorageError};

/// Storage backend reading from a local directory
#[derive(Debug, Clone)]
pub struct LocalFilesystemBackend {
    dir: PathBuf,
}

impl LocalFilesystemBackend {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Map a key to a file path that is guaranteed to live under `dir`
    async fn locate(&self, key: &str) -> Result<PathBuf, StorageError> {
        let segments = checked_segments(key)?;
        let file_path = segments
            .iter()
            .fold(self.dir.clone(), |path, segment| path.join(segment));

        let dir_canonical = fs::canonicalize(&self.dir).await.map_err(|e| {
            StorageError::Unavailable(format!(
                "storage directory '{}' is not accessible: {e}",
                self.dir.display()
            ))
        })?;

        // Missing files are the common case and map straight to NotFound
        let file_canonical = match fs::canonicalize(&file_path).await {
            Ok(p) => p,
            Err(e) => return Err(map_io_error(key, &e)),
        };

        // Symlinks may point outside the directory
        if !file_canonical.starts_with(&dir_canonical) {
            return Err(StorageError::invalid_key(key, "resolves outside storage directory"));
        }

        Ok(file_canonical)
    }
}

#[async_trait]
impl StorageBackend for LocalFilesystemBackend {
    async fn fetch(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.locate(key).await?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| map_io_error(key, &e))?;
        if metadata.is_dir() {
            return Err(StorageError::not_found(key));
        }
        fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| map_io_error(key, &e))
    }

    fn describe(&self) -> String {
        format!("local directory {}", self.dir.display())
    }
}

fn map_io_error(key: &str, err: &std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::IsADirectory => {
            StorageError::not_found(key)
        }
        _ => StorageError::Unavailable(format!("failed to read '{key}': {err}")),
    }
}
