// Configuration module entry point
// Loads layered configuration and derives the resolver settings from it

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

use crate::resolver::{CachePolicy, ResolverConfig};

// Re-export public types
pub use state::AppState;
pub use types::{
    CacheConfig, Config, DocsConfig, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig,
    ServerConfig, StorageConfig, StorageKind,
};

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DOCS_PROXY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "docs-proxy/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("docs.route_prefix", "/docs/")?
            .set_default("docs.index_file", "index.html")?
            .set_default("docs.version_key", "VERSION")?
            .set_default("docs.backend_timeout_ms", 10_000)?
            .set_default("docs.version_ttl_secs", 0)?
            .set_default("storage.backend", "local")?
            .set_default("storage.local_dir", "docs")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), String> {
        let prefix = &self.docs.route_prefix;
        if prefix.len() < 2 || !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(format!(
                "docs.route_prefix '{prefix}' must start and end with '/' and name a route"
            ));
        }
        if self.docs.version_key.trim_matches('/').is_empty() {
            return Err("docs.version_key must not be empty".to_string());
        }
        if self.docs.backend_timeout_ms == 0 {
            return Err("docs.backend_timeout_ms must be greater than zero".to_string());
        }

        if self.cache.default_max_age == 0 {
            return Err("cache.default_max_age must be greater than zero".to_string());
        }
        for rule in &self.cache.rules {
            if rule.max_age == 0 {
                return Err(format!(
                    "cache rule {:?} must have a max_age greater than zero",
                    rule.suffixes
                ));
            }
            if rule.suffixes.is_empty() || rule.suffixes.iter().any(String::is_empty) {
                return Err("cache rules need at least one non-empty suffix".to_string());
            }
        }

        match (self.storage.backend, self.storage.base_url.as_deref()) {
            (StorageKind::Remote, None) => {
                Err("storage.base_url is required for the remote backend".to_string())
            }
            (StorageKind::Remote, Some(url)) if !url.starts_with("http://") => Err(format!(
                "storage.base_url '{url}' must be an http:// endpoint"
            )),
            _ => Ok(()),
        }
    }

    /// Whether responses should carry zero cache lifetimes
    pub const fn caching_disabled(&self) -> bool {
        self.cache.disabled
            || (self.cache.disable_for_local && matches!(self.storage.backend, StorageKind::Local))
    }

    /// Immutable resolver settings derived from this configuration
    pub fn resolver_config(&self) -> ResolverConfig {
        let cache_policy = if self.caching_disabled() {
            CachePolicy::disabled()
        } else {
            CachePolicy::new(self.cache.rules.clone(), self.cache.default_max_age)
        };

        ResolverConfig {
            route_prefix: self.docs.route_prefix.clone(),
            root: self.storage.root.clone(),
            index_file: Some(self.docs.index_file.clone()).filter(|f| !f.is_empty()),
            version_key: self.docs.version_key.trim_matches('/').to_string(),
            backend_timeout: Duration::from_millis(self.docs.backend_timeout_ms),
            version_ttl: Duration::from_secs(self.docs.version_ttl_secs),
            cache_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{CacheDirective, CacheRule, ONE_DAY};

    fn load(toml: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml).unwrap();
        Config::load_from(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_from("does-not-exist/config").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.docs.route_prefix, "/docs/");
        assert_eq!(config.docs.version_key, "VERSION");
        assert_eq!(config.storage.backend, StorageKind::Local);
        assert_eq!(config.cache.rules, CachePolicy::default_rules());
        assert!(config.health.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_backend_disables_cache_by_default() {
        let config = Config::load_from("does-not-exist/config").unwrap();
        assert!(config.caching_disabled());
        let resolver = config.resolver_config();
        assert_eq!(
            resolver.cache_policy.directive_for("a.png"),
            CacheDirective::disabled()
        );
    }

    #[test]
    fn test_remote_backend_from_file() {
        let config = load(
            r#"
[storage]
backend = "remote"
root = "docgen"
local_dir = "unused"
base_url = "http://dartlang-docgen.storage.googleapis.com"

[docs]
route_prefix = "/docs/"
index_file = ""
version_key = "VERSION"
backend_timeout_ms = 2500
version_ttl_secs = 30
"#,
        );
        assert!(config.validate().is_ok());
        assert!(!config.caching_disabled());

        let resolver = config.resolver_config();
        assert_eq!(resolver.root, "docgen");
        assert_eq!(resolver.index_file, None);
        assert_eq!(resolver.backend_timeout, Duration::from_millis(2500));
        assert_eq!(resolver.version_ttl, Duration::from_secs(30));
        assert_eq!(resolver.cache_policy.directive_for("a.png").max_age, ONE_DAY);
    }

    #[test]
    fn test_custom_rules() {
        let config = load(
            r#"
[storage]
backend = "remote"
local_dir = "unused"
base_url = "http://bucket.example.com"

[cache]
default_max_age = 120
rules = [
  { suffixes = [".woff2"], max_age = 31536000 },
]
"#,
        );
        assert_eq!(config.cache.rules, vec![CacheRule::new(&[".woff2"], 31_536_000)]);
        let policy = config.resolver_config().cache_policy;
        assert_eq!(policy.directive_for("font.woff2").max_age, 31_536_000);
        assert_eq!(policy.directive_for("a.png").max_age, 120);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let base = Config::load_from("does-not-exist/config").unwrap();

        let mut config = base.clone();
        config.docs.route_prefix = "docs".to_string();
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.cache.default_max_age = 0;
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.cache.rules = vec![CacheRule::new(&[".png"], 0)];
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.storage.backend = StorageKind::Remote;
        assert!(config.validate().is_err());

        config.storage.base_url = Some("https://bucket.example.com".to_string());
        assert!(config.validate().is_err());

        config.storage.base_url = Some("http://bucket.example.com".to_string());
        assert!(config.validate().is_ok());
    }
}
