// Application state module
// Shared by every connection for the lifetime of the process

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::types::Config;
use crate::resolver::AssetResolver;
use crate::storage::StorageBackend;

/// Application state
pub struct AppState {
    pub config: Config,
    pub resolver: AssetResolver,
    /// Open client connections
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Build state around the backend selected at startup
    pub fn new(config: Config, backend: Arc<dyn StorageBackend>) -> Self {
        let resolver = AssetResolver::new(config.resolver_config(), backend);
        Self {
            config,
            resolver,
            active_connections: AtomicUsize::new(0),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
