//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::AppState;
use crate::handler::assets;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

impl<'a> RequestContext<'a> {
    pub fn from_parts(parts: &'a Parts) -> Self {
        Self {
            path: parts.uri.path(),
            is_head: parts.method == Method::HEAD,
            if_none_match: header_value(parts, "if-none-match"),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read; only GET, HEAD and OPTIONS are served.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();
    let ctx = RequestContext::from_parts(&parts);

    let mut response = match check_http_method(&parts.method, state.config.http.enable_cors) {
        Some(resp) => resp,
        None => route_request(&ctx, &state).await,
    };

    if let Ok(server) = state.config.http.server_name.parse() {
        response.headers_mut().insert(hyper::header::SERVER, server);
    }

    if state.config.logging.access_log {
        let entry = access_entry(&parts, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }
    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    // 0. Health check endpoints (highest priority)
    let health = &state.config.health;
    if health.enabled {
        if ctx.path == health.liveness_path {
            return http::build_health_response(200, "ok");
        }
        if ctx.path == health.readiness_path {
            return readiness(state).await;
        }
    }

    // 1. Documentation assets
    if ctx.path.starts_with(state.resolver.composer().route_prefix()) {
        return assets::serve_asset(ctx, &state.resolver).await;
    }

    // 2. Everything else is outside this proxy
    http::build_404_response()
}

/// Ready once the version marker can be read
async fn readiness(state: &AppState) -> Response<Full<Bytes>> {
    match state.resolver.current_version().await {
        Ok(version) => http::build_health_response(200, &format!("ok {version}")),
        Err(e) => {
            logger::log_warning(&format!("Readiness check failed: {e}"));
            http::build_health_response(503, "unavailable")
        }
    }
}

fn access_entry(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = match parts.version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.referer = header_value(parts, "referer");
    entry.user_agent = header_value(parts, "user-agent");
    entry.docs_version = response
        .headers()
        .get(http::response::VERSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry.cache_control = response
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
