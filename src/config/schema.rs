//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Configuration for a [`MockClient`](crate::MockClient).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Worker threads of the client's dedicated runtime.
    pub worker_threads: usize,

    /// Name given to the runtime's worker threads.
    pub thread_name: String,

    /// Number of chunks buffered between a streaming handler and its consumer.
    pub stream_buffer: usize,

    /// Largest response body (in bytes) a buffered response will collect.
    pub max_body_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            worker_threads: 1,
            thread_name: "mock-ws-worker".to_string(),
            stream_buffer: 16,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}
