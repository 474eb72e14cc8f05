//! In-memory storage backend for tests

use async_trait::async_trait;
use hyper::body::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::storage::{StorageBackend, StorageError};

#[derive(Default)]
pub struct MemoryBackend {
    objects: Mutex<HashMap<String, Bytes>>,
    unavailable: bool,
    delay: Option<Duration>,
    version_reads: AtomicUsize,
    fetches: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.put(key, value);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Every call sleeps this long before answering
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn put(&self, key: &str, value: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from(value.to_string()));
    }

    pub fn version_reads(&self) -> usize {
        self.version_reads.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn lookup(&self, key: &str) -> Result<Bytes, StorageError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable {
            return Err(StorageError::Unavailable("connection refused".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn fetch(&self, key: &str) -> Result<Bytes, StorageError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.lookup(key).await
    }

    async fn fetch_version(&self, key: &str) -> Result<String, StorageError> {
        self.version_reads.fetch_add(1, Ordering::SeqCst);
        let bytes = self.lookup(key).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
