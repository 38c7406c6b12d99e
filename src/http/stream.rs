//! Streamed responses.
//!
//! # Data Flow
//! ```text
//! handler Body (lazy chunks)
//!     → pump task on the client runtime (polls in order)
//!     → bounded mpsc channel (backpressure)
//!     → ChunkStream (consumed by the test, or forwarded as a new Body)
//! ```
//!
//! # Design Decisions
//! - Status and headers are available before the body is read
//! - A single producer keeps chunk order; nothing is dropped or duplicated
//! - Chunk boundaries carry no meaning; only the concatenation does
//! - A body that ends abnormally ends the stream with an error item, never
//!   with a silent end of stream
//! - A dropped consumer stops the pump at its next send

use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use futures_util::{FutureExt, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::http::body::TEXT_PLAIN_UTF_8;
use crate::http::request::RequestDescriptor;
use crate::http::response::header_str;
use crate::observability::metrics;

/// A response whose body is still being produced.
#[derive(Debug)]
pub struct StreamedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: ChunkStream,
}

impl StreamedResponse {
    /// Split the handler response to `request` and start pumping its body.
    ///
    /// Must be called from within a tokio runtime; the pump runs there.
    pub fn from_response(request: &RequestDescriptor, response: Response, buffer: usize) -> Self {
        let (parts, body) = response.into_parts();
        let origin = Origin {
            method: request.method().to_string(),
            url: request.url().to_string(),
        };
        Self {
            status: parts.status,
            headers: parts.headers,
            body: ChunkStream::spawn(origin, body, buffer),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header_str(&self.headers, name)
    }

    /// Content type as set by the handler, `text/plain; charset=utf-8`
    /// otherwise.
    ///
    /// Unlike [`MockResponse::content_type`](crate::MockResponse::content_type)
    /// the body is not inspected, so an untyped JSON stream still reports text.
    pub fn content_type(&self) -> &str {
        self.header(header::CONTENT_TYPE.as_str())
            .unwrap_or(TEXT_PLAIN_UTF_8)
    }

    pub fn body_mut(&mut self) -> &mut ChunkStream {
        &mut self.body
    }

    pub fn into_body(self) -> ChunkStream {
        self.body
    }

    /// Rebuild an axum response with the same head, streaming the same body.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(self.body.into_body());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Request a streamed body belongs to, for error reports.
#[derive(Debug, Clone)]
struct Origin {
    method: String,
    url: String,
}

/// Ordered chunks of a streamed body.
///
/// Ends with an `Err` item if the body failed, the handler panicked while
/// producing it, or the client was closed before it finished.
#[derive(Debug)]
pub struct ChunkStream {
    rx: mpsc::Receiver<Result<Bytes>>,
    finished: Arc<AtomicBool>,
    aborted: bool,
}

impl ChunkStream {
    fn spawn(origin: Origin, body: Body, buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let finished = Arc::new(AtomicBool::new(false));

        let pump_finished = finished.clone();
        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(pump(body, &tx)).catch_unwind().await;
            if outcome.is_err() {
                tracing::error!(method = %origin.method, url = %origin.url, "Handler panicked while streaming");
                let _ = tx
                    .send(Err(Error::HandlerPanicked {
                        method: origin.method,
                        url: origin.url,
                    }))
                    .await;
            }
            // Set before `tx` drops, so the consumer sees it once the channel closes.
            pump_finished.store(true, Ordering::SeqCst);
        });

        Self {
            rx,
            finished,
            aborted: false,
        }
    }

    /// Read every remaining chunk and concatenate them.
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(buf))
    }

    /// Concatenated body decoded as UTF-8, replacing invalid sequences.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Forward the remaining chunks as a new body.
    pub fn into_body(self) -> Body {
        Body::from_stream(self)
    }
}

/// Forward body chunks in order until the body ends, fails, or the
/// consumer goes away.
async fn pump(body: Body, tx: &mpsc::Sender<Result<Bytes>>) {
    let mut chunks = body.into_data_stream();
    while let Some(chunk) = chunks.next().await {
        let failed = chunk.is_err();
        if let Ok(bytes) = &chunk {
            metrics::record_stream_chunk(bytes.len());
        }
        if tx.send(chunk.map_err(Error::Body)).await.is_err() {
            tracing::debug!("Stream consumer dropped, stopping body pump");
            return;
        }
        if failed {
            return;
        }
    }
}

impl Stream for ChunkStream {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match ready!(this.rx.poll_recv(cx)) {
            Some(item) => Poll::Ready(Some(item)),
            None if !this.aborted && !this.finished.load(Ordering::SeqCst) => {
                this.aborted = true;
                Poll::Ready(Some(Err(Error::StreamAborted)))
            }
            None => Poll::Ready(None),
        }
    }
}
