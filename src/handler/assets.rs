//! Documentation asset serving module
//!
//! Resolves a request through the `AssetResolver` and writes the result,
//! mapping resolution failures to HTTP status codes.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use crate::resolver::{AssetResolver, ResolveError, ResolvedAsset};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve one documentation asset
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    resolver: &AssetResolver,
) -> Response<Full<Bytes>> {
    match resolver.resolve(ctx.path).await {
        Ok(asset) => {
            logger::log_debug(&format!(
                "Resolved {} -> {} ({})",
                ctx.path, asset.key, asset.cache_directive
            ));
            build_response(ctx, asset)
        }
        Err(e) => error_response(ctx.path, &e),
    }
}

fn build_response(ctx: &RequestContext<'_>, asset: ResolvedAsset) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&asset.version, &asset.content);
    let cache_control = asset.cache_directive.to_header_value();

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag, &cache_control);
    }

    http::build_asset_response(
        asset.content,
        mime::content_type_for(&asset.key),
        &etag,
        &cache_control,
        &asset.version,
        ctx.is_head,
    )
}

/// Log a resolution failure and build the matching error response
pub fn error_response(path: &str, err: &ResolveError) -> Response<Full<Bytes>> {
    let status = err.status_code();
    let message = match err {
        ResolveError::InvalidPath { .. } => "400 Bad Request",
        ResolveError::AssetNotFound { .. } => "404 Not Found",
        ResolveError::VersionNotFound { .. } => "500 Internal Server Error",
        ResolveError::BackendUnavailable(_) => "502 Bad Gateway",
        ResolveError::Timeout(_) => "504 Gateway Timeout",
    };

    match err {
        ResolveError::AssetNotFound { .. } => logger::log_debug(&format!("{path}: {err}")),
        ResolveError::InvalidPath { .. } => logger::log_warning(&format!("{path}: {err}")),
        _ => logger::log_error(&format!("{path}: {err}")),
    }

    http::build_error_response(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::MemoryBackend;
    use crate::resolver::ResolverConfig;
    use crate::storage::StorageError;
    use std::sync::Arc;
    use std::time::Duration;

    fn resolver(backend: MemoryBackend) -> AssetResolver {
        AssetResolver::new(ResolverConfig::default(), Arc::new(backend))
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    fn docs() -> MemoryBackend {
        MemoryBackend::new()
            .with("VERSION", "42")
            .with("42/favicon.ico", "ICO")
    }

    #[tokio::test]
    async fn test_serves_with_cache_control() {
        let resp = serve_asset(&ctx("/docs/favicon.ico"), &resolver(docs())).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Cache-Control"], "max-age=604800,s-maxage=604800");
        assert_eq!(resp.headers()["Content-Type"], "image/x-icon");
    }

    #[tokio::test]
    async fn test_conditional_request() {
        let resolver = resolver(docs());
        let first = serve_asset(&ctx("/docs/favicon.ico"), &resolver).await;
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let conditional = RequestContext {
            path: "/docs/favicon.ico",
            is_head: false,
            if_none_match: Some(etag),
        };
        let resp = serve_asset(&conditional, &resolver).await;
        assert_eq!(resp.status(), 304);
        assert_eq!(resp.headers()["Cache-Control"], "max-age=604800,s-maxage=604800");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let resolver_ok = resolver(docs());
        assert_eq!(serve_asset(&ctx("/docs/missing.html"), &resolver_ok).await.status(), 404);
        assert_eq!(serve_asset(&ctx("/docs/../VERSION"), &resolver_ok).await.status(), 400);

        let no_version = resolver(MemoryBackend::new());
        assert_eq!(serve_asset(&ctx("/docs/a.html"), &no_version).await.status(), 500);

        let down = resolver(docs().unavailable());
        assert_eq!(serve_asset(&ctx("/docs/a.html"), &down).await.status(), 502);
    }

    #[tokio::test]
    async fn test_unusable_version_is_an_error() {
        let backend = MemoryBackend::new()
            .with("VERSION", "4\u{1}2")
            .with("4\u{1}2/a.html", "hello");
        let resp = serve_asset(&ctx("/docs/a.html"), &resolver(backend)).await;
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.headers()["Cache-Control"], "no-store");
    }

    #[test]
    fn test_error_response_mapping() {
        let resp = error_response("/docs/x", &ResolveError::Timeout(Duration::from_secs(1)));
        assert_eq!(resp.status(), 504);
        let resp = error_response(
            "/docs/x",
            &ResolveError::BackendUnavailable(StorageError::Unavailable("reset".into())),
        );
        assert_eq!(resp.status(), 502);
        assert_eq!(resp.headers()["Cache-Control"], "no-store");
    }
}
