//! The mock HTTP client.
//!
//! # Data Flow
//! ```text
//! MockClient::url(path)
//!     → request.rs (MockRequest: chained with_* calls, immutable)
//!     → terminal op (get/post/put/delete/patch/execute/stream)
//!     → runtime.rs (task spawned on the client's own runtime)
//!     → dispatcher.rs (match route, build request, run handler)
//!     → http::response / http::stream (buffered or streamed view)
//! ```
//!
//! # Design Decisions
//! - The route table is shared read-only; clients hold no per-request state
//! - Every failure is delivered through the returned future
//! - `close()` must be called (or the client dropped) to release the runtime

pub mod dispatcher;
pub mod request;
pub mod runtime;

use std::future::Future;
use std::sync::Arc;

use crate::config::validation::validate_config;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::request::RequestDescriptor;
use crate::http::response::MockResponse;
use crate::http::stream::StreamedResponse;
use crate::routing::RouteTable;

pub use dispatcher::Dispatcher;
pub use request::MockRequest;
pub use runtime::ExecutionContext;

/// An HTTP client whose requests are answered by a route table.
///
/// ```
/// use mock_ws::{MockClient, RouteTable};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let table = RouteTable::builder()
///     .route("GET", "/get", |_req| async { "get ok" })
///     .build();
/// let client = MockClient::new(table).unwrap();
///
/// let response = client.url("/get").get().await.unwrap();
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.text(), "get ok");
///
/// let err = client.url("/get").delete().await.unwrap_err();
/// assert_eq!(err.to_string(), "no route defined for DELETE /get");
///
/// client.close();
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    dispatcher: Dispatcher,
    context: ExecutionContext,
    config: ClientConfig,
}

impl MockClient {
    /// Create a client with the default configuration.
    pub fn new(table: impl Into<Arc<RouteTable>>) -> Result<Self> {
        Self::with_config(table, ClientConfig::default())
    }

    /// Create a client with an explicit configuration.
    pub fn with_config(table: impl Into<Arc<RouteTable>>, config: ClientConfig) -> Result<Self> {
        validate_config(&config).map_err(|errors| {
            let messages: Vec<_> = errors.iter().map(ToString::to_string).collect();
            Error::Config(messages.join(", "))
        })?;

        let dispatcher = Dispatcher::new(table.into());
        let context = ExecutionContext::new(&config)?;

        tracing::info!(routes = dispatcher.table().len(), "Mock client created");

        Ok(Self {
            inner: Arc::new(ClientInner {
                dispatcher,
                context,
                config,
            }),
        })
    }

    /// Start a request to `url`, absolute or relative.
    pub fn url(&self, url: impl Into<String>) -> MockRequest {
        MockRequest::new(self.clone(), RequestDescriptor::new(url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn routes(&self) -> &RouteTable {
        self.inner.dispatcher.table()
    }

    /// Release the client's runtime. Further dispatches fail with
    /// [`Error::Closed`]. Calling it again does nothing.
    pub fn close(&self) {
        if self.inner.context.close() {
            tracing::info!("Mock client closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.context.is_closed()
    }

    /// Dispatch and buffer the whole response body.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<MockResponse> {
        let dispatcher = self.inner.dispatcher.clone();
        let limit = self.inner.config.max_body_bytes;
        let label = Label::of(&descriptor);
        self.run(label, async move {
            let response = dispatcher.dispatch(&descriptor).await?;
            MockResponse::from_response(response, limit).await
        })
        .await
    }

    /// Dispatch and return as soon as the handler has produced its head.
    pub async fn stream(&self, descriptor: RequestDescriptor) -> Result<StreamedResponse> {
        let dispatcher = self.inner.dispatcher.clone();
        let buffer = self.inner.config.stream_buffer;
        let label = Label::of(&descriptor);
        self.run(label, async move {
            let response = dispatcher.dispatch(&descriptor).await?;
            Ok(StreamedResponse::from_response(&descriptor, response, buffer))
        })
        .await
    }

    async fn run<T, F>(&self, label: Label, task: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        match self.inner.context.spawn(task)?.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => {
                tracing::error!(method = %label.method, url = %label.url, "Handler panicked");
                Err(Error::HandlerPanicked {
                    method: label.method,
                    url: label.url,
                })
            }
            Err(_) => Err(Error::Closed),
        }
    }
}

/// Method and URL kept for reporting a panicked handler.
struct Label {
    method: String,
    url: String,
}

impl Label {
    fn of(descriptor: &RequestDescriptor) -> Self {
        Self {
            method: descriptor.method().to_string(),
            url: descriptor.url().to_string(),
        }
    }
}
