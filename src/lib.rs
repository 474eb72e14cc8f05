//! Versioned documentation asset proxy
//!
//! Requests under a route prefix are mapped onto a storage backend key
//! `<root>/<version>/<path>`, where `<version>` is read from a marker
//! object, and served with a per-suffix `Cache-Control` policy.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod resolver;
pub mod server;
pub mod storage;
