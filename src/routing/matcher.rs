//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request method (exact string, custom methods allowed)
//! - Match the request path (exact, prefix or catch-all)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Method matching is case-sensitive, as supplied by the caller
//! - Path matching is case-sensitive and never sees the query string
//! - `Any` = always matches (wildcard)
//! - No regex to guarantee O(n) matching

use axum::http::Method;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if a request with this method and path matches.
    fn matches(&self, method: &Method, path: &str) -> bool;
}

/// Matches the request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatcher {
    /// Exact, case-sensitive comparison against `Method::as_str()`.
    Exact(String),
    /// Matches every method.
    Any,
}

impl MethodMatcher {
    /// Create an exact method matcher.
    pub fn exact(method: impl Into<String>) -> Self {
        MethodMatcher::Exact(method.into())
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, method: &Method, _path: &str) -> bool {
        match self {
            MethodMatcher::Exact(expected) => method.as_str() == expected,
            MethodMatcher::Any => true,
        }
    }
}

impl From<&str> for MethodMatcher {
    /// `"*"` matches every method, anything else is an exact match.
    fn from(method: &str) -> Self {
        if method == "*" {
            MethodMatcher::Any
        } else {
            MethodMatcher::exact(method)
        }
    }
}

impl From<String> for MethodMatcher {
    fn from(method: String) -> Self {
        MethodMatcher::from(method.as_str())
    }
}

impl From<Method> for MethodMatcher {
    fn from(method: Method) -> Self {
        MethodMatcher::Exact(method.as_str().to_string())
    }
}

impl From<&Method> for MethodMatcher {
    fn from(method: &Method) -> Self {
        MethodMatcher::Exact(method.as_str().to_string())
    }
}

/// Matches the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// Byte-for-byte equality with the request path.
    Exact(String),
    /// The request path starts with this prefix.
    Prefix(String),
    /// Matches every path.
    Any,
}

impl PathMatcher {
    /// Create an exact path matcher.
    pub fn exact(path: impl Into<String>) -> Self {
        PathMatcher::Exact(path.into())
    }

    /// Create a path prefix matcher.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        PathMatcher::Prefix(prefix.into())
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, _method: &Method, path: &str) -> bool {
        match self {
            PathMatcher::Exact(expected) => path == expected,
            PathMatcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
            PathMatcher::Any => true,
        }
    }
}

impl From<&str> for PathMatcher {
    /// `"*"` matches every path, a trailing `*` makes a prefix match,
    /// anything else is an exact match.
    fn from(path: &str) -> Self {
        match path.strip_suffix('*') {
            Some("") => PathMatcher::Any,
            Some(prefix) => PathMatcher::prefix(prefix),
            None => PathMatcher::exact(path),
        }
    }
}

impl From<String> for PathMatcher {
    fn from(path: String) -> Self {
        PathMatcher::from(path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_matcher() {
        let matcher = MethodMatcher::from("PATCH");
        assert!(matcher.matches(&Method::PATCH, "/"));
        assert!(!matcher.matches(&Method::POST, "/"));

        let custom = Method::from_bytes(b"PURGE").unwrap();
        assert!(MethodMatcher::from("PURGE").matches(&custom, "/"));

        // Case sensitive
        let lower = Method::from_bytes(b"get").unwrap();
        assert!(!MethodMatcher::from(Method::GET).matches(&lower, "/"));

        assert!(MethodMatcher::from("*").matches(&lower, "/"));
    }

    #[test]
    fn test_path_matcher() {
        assert_eq!(PathMatcher::from("*"), PathMatcher::Any);
        assert_eq!(PathMatcher::from("/api/*"), PathMatcher::prefix("/api/"));
        assert_eq!(PathMatcher::from("/get"), PathMatcher::exact("/get"));

        let exact = PathMatcher::from("/get");
        assert!(exact.matches(&Method::GET, "/get"));
        assert!(!exact.matches(&Method::GET, "/get/"));
        assert!(!exact.matches(&Method::GET, "/GET"));

        let prefix = PathMatcher::from("/api/*");
        assert!(prefix.matches(&Method::GET, "/api/v1"));
        assert!(!prefix.matches(&Method::GET, "/images"));
    }
}
