//! Request dispatch.
//!
//! # Responsibilities
//! - Resolve a descriptor into method, path and query
//! - Find the first matching route
//! - Build the synthetic request the handler receives
//! - Invoke the handler and hand back its response untouched
//!
//! # Design Decisions
//! - Stateless apart from the shared, read-only route table
//! - No match is reported as `Error::UnmatchedRoute`, never as a 404
//! - Builder headers are appended in order; an inferred Content-Type is
//!   only added when the test did not set one

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, Request};
use axum::response::Response;

use crate::error::{Error, Result};
use crate::http::request::{RequestDescriptor, Target};
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Matches descriptors against a route table and runs their handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
}

impl Dispatcher {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Run the handler matching `descriptor` and return its response.
    pub async fn dispatch(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        let start_time = Instant::now();
        let target = descriptor.target()?;

        tracing::debug!(
            method = %target.method,
            path = %target.path,
            query_params = target.query.len(),
            "Dispatching mock request"
        );

        let route = match self.table.match_route(&target.method, &target.path) {
            Some(route) => route,
            None => {
                tracing::warn!(method = %target.method, path = %target.path, "No route matched");
                metrics::record_unmatched(target.method.as_str());
                return Err(Error::UnmatchedRoute {
                    method: target.method.to_string(),
                    path: target.path,
                });
            }
        };

        let handler = route.handler();
        let request = build_request(descriptor, &target)?;
        let response = handler(request).await;

        tracing::debug!(
            method = %target.method,
            path = %target.path,
            status = %response.status(),
            "Handler responded"
        );
        metrics::record_dispatch(target.method.as_str(), response.status().as_u16(), start_time);

        Ok(response)
    }
}

/// Build the request a handler sees for `descriptor`.
pub fn build_request(descriptor: &RequestDescriptor, target: &Target) -> Result<Request<Body>> {
    let mut request = Request::builder()
        .method(target.method.clone())
        .uri(target.path_and_query())
        .body(Body::from(descriptor.body().to_bytes()))
        .map_err(|e| Error::InvalidUrl {
            url: descriptor.url().to_string(),
            reason: e.to_string(),
        })?;

    let headers = request.headers_mut();
    for (name, value) in descriptor.headers() {
        let invalid = || Error::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.append(header_name, header_value);
    }

    if !headers.contains_key(header::CONTENT_TYPE) {
        if let Some(content_type) = descriptor.body().inferred_content_type() {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }

    if !headers.contains_key(header::HOST) {
        if let Some(host) = target.host.as_deref() {
            if let Ok(value) = HeaderValue::from_str(host) {
                headers.insert(header::HOST, value);
            }
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn echo_table() -> Arc<RouteTable> {
        Arc::new(
            RouteTable::builder()
                .route("GET", "/get", |_req| async { "get ok" })
                .route("POST", "/echo", |req: Request<Body>| async move {
                    let content_type = req
                        .headers()
                        .get(header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("none")
                        .to_string();
                    let body = axum::body::to_bytes(req.into_body(), usize::MAX)
                        .await
                        .unwrap_or_default();
                    (StatusCode::ACCEPTED, format!("{} {}", content_type, String::from_utf8_lossy(&body)))
                })
                .build(),
        )
    }

    #[tokio::test]
    async fn test_dispatch_match() {
        let dispatcher = Dispatcher::new(echo_table());
        let response = dispatcher.dispatch(&RequestDescriptor::new("/get?x=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dispatch_unmatched() {
        let dispatcher = Dispatcher::new(echo_table());
        let err = dispatcher
            .dispatch(&RequestDescriptor::new("/get?x=1").with_method("DELETE"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no route defined for DELETE /get");
    }

    #[tokio::test]
    async fn test_dispatch_infers_content_type() {
        let dispatcher = Dispatcher::new(echo_table());
        let descriptor = RequestDescriptor::new("/echo")
            .with_method("POST")
            .with_body(json!({"a": 1}));
        let response = dispatcher.dispatch(&descriptor).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"application/json {"a":1}"#);
    }

    #[test]
    fn test_build_request_keeps_explicit_content_type() {
        let descriptor = RequestDescriptor::new("http://example.com/echo")
            .with_header("Content-Type", "text/csv")
            .with_header("X-Multi", "1")
            .with_header("x-multi", "2")
            .with_body("a,b");
        let target = descriptor.target().unwrap();
        let request = build_request(&descriptor, &target).unwrap();

        assert_eq!(request.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(request.headers()[header::HOST], "example.com");
        assert_eq!(request.headers().get_all("x-multi").iter().count(), 2);
    }

    #[test]
    fn test_build_request_rejects_bad_header() {
        let descriptor = RequestDescriptor::new("/").with_header("bad header", "v");
        let target = descriptor.target().unwrap();
        let err = build_request(&descriptor, &target).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { ref name } if name == "bad header"));
    }
}
