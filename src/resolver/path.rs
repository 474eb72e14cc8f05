//! Backend key composition
//!
//! Turns `(version, request path)` into the object key to fetch:
//! `<root>/<version>/<remainder>`.

use super::error::ResolveError;
use crate::storage::segment_violation;

/// Composes backend keys from a version and an inbound request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathComposer {
    route_prefix: String,
    root: String,
    index_file: Option<String>,
}

impl PathComposer {
    /// `route_prefix` must start and end with `/`, e.g. `/docs/`.
    /// `root` is the key prefix inside the store and may be empty.
    pub fn new(route_prefix: &str, root: &str, index_file: Option<&str>) -> Self {
        Self {
            route_prefix: route_prefix.to_string(),
            root: root.trim_matches('/').to_string(),
            index_file: index_file
                .map(|f| f.trim_matches('/'))
                .filter(|f| !f.is_empty())
                .map(ToString::to_string),
        }
    }

    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    /// Key of an object that lives beside the version folders, e.g. `VERSION`
    pub fn root_key(&self, name: &str) -> String {
        join_key(&self.root, name)
    }

    /// Strip the route prefix and normalize what remains
    ///
    /// Fails when the literal prefix is absent, when nothing is left, or when a
    /// segment would climb out of the version folder.
    pub fn relative_path(&self, request_path: &str) -> Result<String, ResolveError> {
        let Some(remainder) = request_path.strip_prefix(self.route_prefix.as_str()) else {
            return Err(ResolveError::invalid_path(
                request_path,
                format!("missing route prefix '{}'", self.route_prefix),
            ));
        };

        let mut segments = Vec::new();
        for segment in remainder.split('/') {
            match segment {
                "" | "." => {}
                s => {
                    if let Some(reason) = segment_violation(s) {
                        return Err(ResolveError::invalid_path(request_path, reason));
                    }
                    segments.push(s);
                }
            }
        }

        if segments.is_empty() {
            return Err(ResolveError::invalid_path(
                request_path,
                "empty path after route prefix",
            ));
        }

        if remainder.ends_with('/') {
            if let Some(index) = &self.index_file {
                segments.push(index.as_str());
            }
        }

        Ok(segments.join("/"))
    }

    /// Compose the full backend key for `request_path` at `version`
    pub fn compose(&self, version: &str, request_path: &str) -> Result<String, ResolveError> {
        if version.is_empty() || version == "." || segment_violation(version).is_some() {
            return Err(ResolveError::invalid_path(
                request_path,
                format!("version '{version}' is not a single path segment"),
            ));
        }
        let relative = self.relative_path(request_path)?;
        Ok(join_key(&join_key(&self.root, version), &relative))
    }
}

fn join_key(left: &str, right: &str) -> String {
    if left.is_empty() {
        right.to_string()
    } else {
        format!("{left}/{right}")
    }
}
