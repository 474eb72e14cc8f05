//! Remote object store backend
//!
//! Reads public objects from a bucket over plain HTTP, e.g.
//! `http://<bucket>.storage.googleapis.com/<key>`.

use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::{checked_segments, StorageBackend, StorageError};

/// Storage backend fetching objects from an HTTP object store endpoint
#[derive(Clone)]
pub struct RemoteObjectStoreBackend {
    base_url: String,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl RemoteObjectStoreBackend {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let uri: Uri = base_url
            .parse()
            .map_err(|e| format!("Invalid storage base URL '{base_url}': {e}"))?;
        if uri.scheme_str() != Some("http") {
            return Err(format!(
                "Unsupported storage base URL '{base_url}': only http:// endpoints are supported"
            ));
        }

        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self { base_url, client })
    }

    fn object_uri(&self, key: &str) -> Result<Uri, StorageError> {
        let path = checked_segments(key)?.join("/");
        format!("{}/{path}", self.base_url)
            .parse()
            .map_err(|e| StorageError::invalid_key(key, format!("not a valid URI path: {e}")))
    }
}

#[async_trait]
impl StorageBackend for RemoteObjectStoreBackend {
    async fn fetch(&self, key: &str) -> Result<Bytes, StorageError> {
        let uri = self.object_uri(key)?;
        let response = self
            .client
            .get(uri)
            .await
            .map_err(|e| StorageError::Unavailable(format!("request for '{key}' failed: {e}")))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND | StatusCode::GONE => return Err(StorageError::not_found(key)),
            status => {
                return Err(StorageError::Unavailable(format!(
                    "object store returned {status} for '{key}'"
                )));
            }
        }

        let body = response.into_body().collect().await.map_err(|e| {
            StorageError::Unavailable(format!("failed to read body of '{key}': {e}"))
        })?;
        Ok(body.to_bytes())
    }

    fn describe(&self) -> String {
        format!("object store {}", self.base_url)
    }
}

impl std::fmt::Debug for RemoteObjectStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteObjectStoreBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::{Request, Response};
    use hyper_util::rt::TokioIo;
    use http_body_util::Full;
    use std::convert::Infallible;
    use tokio::net::TcpListener;

    /// Serve a tiny fake bucket: `/VERSION`, `/7/index.html`, everything else 404,
    /// and `/broken` answers 500
    async fn spawn_bucket() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let service = service_fn(|req: Request<hyper::body::Incoming>| async move {
                        let (status, body): (u16, &str) = match req.uri().path() {
                            "/VERSION" => (200, "7\n"),
                            "/7/index.html" => (200, "<html></html>"),
                            "/broken" => (500, "boom"),
                            _ => (404, "missing"),
                        };
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .body(Full::new(Bytes::from(body)))
                                .unwrap(),
                        )
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });
        format!("http://{addr}/")
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(RemoteObjectStoreBackend::new("https://bucket.example.com").is_err());
        assert!(RemoteObjectStoreBackend::new("not a url").is_err());
        assert!(RemoteObjectStoreBackend::new("http://bucket.example.com/").is_ok());
    }

    #[test]
    fn test_object_uri() {
        let backend = RemoteObjectStoreBackend::new("http://bucket.example.com/").unwrap();
        assert_eq!(
            backend.object_uri("root/42/a/b.js").unwrap().to_string(),
            "http://bucket.example.com/root/42/a/b.js"
        );
        assert!(matches!(
            backend.object_uri("root/42/%2e%2e%2fVERSION"),
            Err(StorageError::InvalidKey { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_from_bucket() {
        let backend = RemoteObjectStoreBackend::new(&spawn_bucket().await).unwrap();
        assert_eq!(backend.fetch_version("VERSION").await.unwrap(), "7\n");
        let page = backend.fetch("7/index.html").await.unwrap();
        assert_eq!(&page[..], b"<html></html>");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let backend = RemoteObjectStoreBackend::new(&spawn_bucket().await).unwrap();
        assert!(matches!(
            backend.fetch("7/missing.png").await,
            Err(StorageError::NotFound { .. })
        ));
        assert!(matches!(
            backend.fetch("broken").await,
            Err(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = RemoteObjectStoreBackend::new(&format!("http://{addr}")).unwrap();
        assert!(matches!(
            backend.fetch("VERSION").await,
            Err(StorageError::Unavailable(_))
        ));
    }
}
