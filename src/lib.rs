//! In-process test double for an async HTTP client.
//!
//! Requests built with [`MockClient`] never touch the network. Each one is
//! matched against a [`RouteTable`] of `(method, path) → handler` entries
//! and answered by the first matching handler, as if a server had replied.
//! Handlers are plain axum handlers, so status codes, headers, JSON bodies
//! and streamed bodies all behave the way they would over the wire.
//!
//! ```text
//!   test code
//!      │  client.url("/get").with_header(..).get()
//!      ▼
//!  ┌──────────┐   ┌────────────┐   ┌─────────────┐   ┌──────────────┐
//!  │  client  │──▶│ dispatcher │──▶│ route table │──▶│   handler    │
//!  │ request  │   │            │   │ first match │   │ (axum / fn)  │
//!  └──────────┘   └────────────┘   └─────────────┘   └──────┬───────┘
//!      ▲                                                      │
//!      │         MockResponse / StreamedResponse              │
//!      └──────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod routing;

pub use client::{MockClient, MockRequest};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{
    AuthScheme, ChunkStream, MockResponse, RequestBody, RequestDescriptor, RequestSigner,
    StreamedResponse,
};
pub use routing::{MethodMatcher, PathMatcher, RouteTable};
