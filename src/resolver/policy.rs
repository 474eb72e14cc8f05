//! Cache lifetime policy
//!
//! Maps an object key to the `Cache-Control` lifetimes served with it, using an
//! ordered suffix table where the first matching rule wins.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ONE_HOUR: u64 = 60 * 60;
pub const ONE_DAY: u64 = ONE_HOUR * 24;
pub const ONE_WEEK: u64 = ONE_DAY * 7;

/// Browser and shared-cache lifetimes, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDirective {
    pub max_age: u64,
    pub s_max_age: u64,
}

impl CacheDirective {
    pub const fn uniform(age: u64) -> Self {
        Self {
            max_age: age,
            s_max_age: age,
        }
    }

    /// Caching switched off (local development)
    pub const fn disabled() -> Self {
        Self::uniform(0)
    }

    /// Render as a `Cache-Control` header value
    pub fn to_header_value(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max-age={},s-maxage={}", self.max_age, self.s_max_age)
    }
}

/// One row of the policy table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRule {
    /// Literal, case-sensitive suffixes, e.g. `.png`
    pub suffixes: Vec<String>,
    /// Lifetime applied to both `max-age` and `s-maxage`
    pub max_age: u64,
}

impl CacheRule {
    pub fn new(suffixes: &[&str], max_age: u64) -> Self {
        Self {
            suffixes: suffixes.iter().map(ToString::to_string).collect(),
            max_age,
        }
    }

    fn matches(&self, path: &str) -> bool {
        self.suffixes.iter().any(|s| path.ends_with(s.as_str()))
    }
}

/// Ordered rule table with a fallback lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    rules: Vec<CacheRule>,
    default_max_age: u64,
    disabled: bool,
}

impl CachePolicy {
    pub const fn new(rules: Vec<CacheRule>, default_max_age: u64) -> Self {
        Self {
            rules,
            default_max_age,
            disabled: false,
        }
    }

    /// Policy that answers `(0, 0)` for everything
    pub const fn disabled() -> Self {
        Self {
            rules: Vec::new(),
            default_max_age: 0,
            disabled: true,
        }
    }

    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn default_rules() -> Vec<CacheRule> {
        vec![
            CacheRule::new(&[".png", ".jpg"], ONE_DAY),
            CacheRule::new(&[".ico"], ONE_WEEK),
        ]
    }

    /// Directive for the object at `path`. Total and deterministic.
    pub fn directive_for(&self, path: &str) -> CacheDirective {
        if self.disabled {
            return CacheDirective::disabled();
        }
        let age = self
            .rules
            .iter()
            .find(|rule| rule.matches(path))
            .map_or(self.default_max_age, |rule| rule.max_age);
        CacheDirective::uniform(age)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(Self::default_rules(), ONE_HOUR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let policy = CachePolicy::default();
        assert_eq!(policy.directive_for("x.png"), CacheDirective::uniform(86400));
        assert_eq!(policy.directive_for("x.jpg"), CacheDirective::uniform(86400));
        assert_eq!(policy.directive_for("x.ico"), CacheDirective::uniform(604_800));
        assert_eq!(policy.directive_for("x.html"), CacheDirective::uniform(3600));
        assert_eq!(policy.directive_for("x"), CacheDirective::uniform(3600));
    }

    #[test]
    fn test_full_keys() {
        let policy = CachePolicy::default();
        assert_eq!(
            policy.directive_for("docgen/42/img/logo.png").max_age,
            ONE_DAY
        );
        assert_eq!(policy.directive_for("docgen/42/favicon.ico").max_age, ONE_WEEK);
        assert_eq!(policy.directive_for("docgen/42/png/index.js").max_age, ONE_HOUR);
    }

    #[test]
    fn test_case_sensitive() {
        let policy = CachePolicy::default();
        assert_eq!(policy.directive_for("LOGO.PNG").max_age, ONE_HOUR);
        assert_eq!(policy.directive_for("photo.jpeg").max_age, ONE_HOUR);
    }

    #[test]
    fn test_first_match_wins() {
        let policy = CachePolicy::new(
            vec![
                CacheRule::new(&[".min.js"], 600),
                CacheRule::new(&[".js"], 60),
            ],
            30,
        );
        assert_eq!(policy.directive_for("app.min.js").max_age, 600);
        assert_eq!(policy.directive_for("app.js").max_age, 60);
        assert_eq!(policy.directive_for("app.css").max_age, 30);
    }

    #[test]
    fn test_disabled() {
        let policy = CachePolicy::disabled();
        assert!(policy.is_disabled());
        assert_eq!(policy.directive_for("x.png"), CacheDirective::disabled());
    }

    #[test]
    fn test_header_value() {
        assert_eq!(
            CacheDirective::uniform(ONE_DAY).to_header_value(),
            "max-age=86400,s-maxage=86400"
        );
        assert_eq!(CacheDirective::disabled().to_header_value(), "max-age=0,s-maxage=0");
    }
}
