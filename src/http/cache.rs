//! HTTP cache validation module
//!
//! Provides `ETag` generation and conditional request handling. Lifetimes
//! themselves come from the resolver's `CachePolicy`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate `ETag` using fast hashing
///
/// The docs version is part of the tag.
///
/// # Returns
/// Quoted `ETag` string, e.g., `"42-abc123def"`
pub fn generate_etag(version: &str, content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{version}-{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Weak validators: `W/"abc123"`
/// - Wildcard: `*`
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').any(|e| {
            let e = e.trim();
            e == "*" || e.trim_start_matches("W/") == etag
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag("42", b"hello world");
        assert!(etag.starts_with("\"42-"));
        assert!(etag.ends_with('"'));
    }

    #[test]
    fn test_etag_consistency() {
        assert_eq!(
            generate_etag("42", b"same content"),
            generate_etag("42", b"same content")
        );
    }

    #[test]
    fn test_etag_difference() {
        assert_ne!(
            generate_etag("42", b"content a"),
            generate_etag("42", b"content b")
        );
        assert_ne!(
            generate_etag("42", b"content"),
            generate_etag("43", b"content")
        );
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }
}
