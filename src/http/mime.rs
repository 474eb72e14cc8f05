//! MIME type detection module
//!
//! Returns the Content-Type for a backend key from its file extension. The
//! table covers what a generated documentation tree contains.

use std::path::Path;

/// Get MIME Content-Type for an object key
///
/// # Examples
/// ```
/// use docs_proxy::http::mime::content_type_for;
/// assert_eq!(content_type_for("docgen/42/index.html"), "text/html; charset=utf-8");
/// assert_eq!(content_type_for("docgen/42/favicon.ico"), "image/x-icon");
/// assert_eq!(content_type_for("docgen/42/LICENSE"), "application/octet-stream");
/// ```
pub fn content_type_for(key: &str) -> &'static str {
    match Path::new(key).extension().and_then(|e| e.to_str()) {
        // Pages and sources
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("dart") => "application/dart",

        // Scripts, search indexes, source maps
        Some("js") => "application/javascript",
        Some("json" | "map") => "application/json",

        // Images
        Some("png") => "image/png",
        Some("jpg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        _ => "application/octet-stream",
    }
}
