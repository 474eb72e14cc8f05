// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

use crate::resolver::{CacheRule, CachePolicy, ONE_HOUR};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub docs: DocsConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: debug, info, warn or error
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

/// Documentation route and resolution settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DocsConfig {
    /// Route prefix, must start and end with `/`
    pub route_prefix: String,
    /// Served for request paths ending in `/`; empty disables
    pub index_file: String,
    /// Version marker object name, relative to `storage.root`
    pub version_key: String,
    /// Deadline for the backend reads of a single request
    pub backend_timeout_ms: u64,
    /// How long a fetched version may be reused; 0 re-reads on every request
    pub version_ttl_secs: u64,
}

/// Which storage backend serves the assets
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Local directory (development)
    Local,
    /// Remote object store over HTTP (production)
    Remote,
}

/// Storage backend configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageKind,
    /// Key prefix inside the store, e.g. `docgen`
    #[serde(default)]
    pub root: String,
    /// Directory served by the local backend
    pub local_dir: String,
    /// Endpoint of the remote backend, e.g. `http://bucket.storage.googleapis.com`
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Cache lifetime policy configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    /// Serve `max-age=0,s-maxage=0` for everything
    #[serde(default)]
    pub disabled: bool,
    /// Disable caching automatically when the local backend is selected
    #[serde(default = "default_disable_for_local")]
    pub disable_for_local: bool,
    #[serde(default = "default_max_age")]
    pub default_max_age: u64,
    /// Ordered suffix rules, first match wins
    #[serde(default = "CachePolicy::default_rules")]
    pub rules: Vec<CacheRule>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_disable_for_local() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_age() -> u64 {
    ONE_HOUR
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            disable_for_local: default_disable_for_local(),
            default_max_age: default_max_age(),
            rules: CachePolicy::default_rules(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
