//! Metrics collection.
//!
//! # Metrics
//! - `mock_ws_dispatch_total` (counter): dispatches by method and outcome
//! - `mock_ws_dispatch_duration_seconds` (histogram): time spent in handlers
//! - `mock_ws_stream_bytes_total` (counter): bytes pumped from streamed bodies

use std::time::Instant;

/// Record a dispatch that reached a handler.
pub fn record_dispatch(method: &str, status: u16, start_time: Instant) {
    let outcome = if status >= 500 {
        "server_error"
    } else if status >= 400 {
        "client_error"
    } else {
        "ok"
    };
    metrics::counter!(
        "mock_ws_dispatch_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "mock_ws_dispatch_duration_seconds",
        "method" => method.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Record a dispatch that matched no route.
pub fn record_unmatched(method: &str) {
    metrics::counter!(
        "mock_ws_dispatch_total",
        "method" => method.to_string(),
        "outcome" => "unmatched"
    )
    .increment(1);
}

pub fn record_stream_chunk(len: usize) {
    metrics::counter!("mock_ws_stream_bytes_total").increment(len as u64);
}
