//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::convert::Infallible;

use axum::body::Body;
use axum::http::Request;
use mock_ws::observability::logging::init_logging;
use mock_ws::{MockClient, RouteTable};

/// Build a client over `table`, with test logging enabled.
pub fn client(table: RouteTable) -> MockClient {
    init_logging("mock_ws=debug");
    MockClient::new(table).expect("create mock client")
}

/// A lazily produced body emitting each chunk in order.
pub fn chunked_body(chunks: Vec<String>) -> Body {
    Body::from_stream(futures_util::stream::iter(
        chunks.into_iter().map(Ok::<_, Infallible>),
    ))
}

/// `n` numbered chunks: "chunk-0;", "chunk-1;", ...
pub fn numbered_chunks(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("chunk-{};", i)).collect()
}

/// Decoded query parameters the handler received, in order.
pub fn query_pairs(req: &Request<Body>) -> Vec<(String, String)> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Request body as text.
pub async fn body_text(req: Request<Body>) -> String {
    let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}
