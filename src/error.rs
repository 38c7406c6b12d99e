//! Error types for the mock client.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a dispatch.
///
/// Only [`Error::UnmatchedRoute`] is produced by routing itself. The remaining
/// variants cover requests that could not be turned into a synthetic request,
/// bodies that failed while being read, and the client's own runtime.
/// Statuses returned by handlers (4xx, 5xx) are never mapped to errors.
#[derive(Debug, Error)]
pub enum Error {
    /// No route table entry accepted the request's method and path.
    #[error("no route defined for {method} {path}")]
    UnmatchedRoute { method: String, path: String },

    /// The request URL could not be parsed.
    #[error("invalid request url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request method is not a valid HTTP token.
    #[error("invalid request method {0:?}")]
    InvalidMethod(String),

    /// A header name or value could not be carried by the synthetic request.
    #[error("invalid header {name:?}")]
    InvalidHeader { name: String },

    /// A structured request body failed to serialize.
    #[error("failed to serialize request body: {0}")]
    Serialize(String),

    /// A request or response body failed while being read.
    #[error("failed to read body: {0}")]
    Body(#[from] axum::Error),

    /// The response body was not valid JSON for the requested type.
    #[error("failed to decode json body: {0}")]
    Json(#[from] serde_json::Error),

    /// The handler panicked while producing a response.
    #[error("handler for {method} {url} panicked")]
    HandlerPanicked { method: String, url: String },

    /// A streamed body stopped before the handler finished producing it.
    #[error("streamed body ended before the handler finished it")]
    StreamAborted,

    /// The client was closed before the dispatch completed.
    #[error("mock client is closed")]
    Closed,

    /// The client configuration failed validation.
    #[error("invalid client config: {0}")]
    Config(String),

    /// The client's execution context could not be created.
    #[error("failed to start mock client runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl Error {
    /// Returns true for the routing failure raised when no entry matches.
    pub fn is_unmatched_route(&self) -> bool {
        matches!(self, Error::UnmatchedRoute { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_route_message() {
        let err = Error::UnmatchedRoute {
            method: "DELETE".into(),
            path: "/get".into(),
        };
        assert_eq!(err.to_string(), "no route defined for DELETE /get");
        assert!(err.is_unmatched_route());
        assert!(!Error::Closed.is_unmatched_route());
    }
}
