//! Buffered responses.
//!
//! # Responsibilities
//! - Collect the handler's body into one buffer
//! - Expose status, headers and body views (bytes, text, json, xml)
//! - Resolve the content type a real server would have reported
//!
//! # Design Decisions
//! - Handler statuses pass through untouched; 4xx/5xx are not errors
//! - An explicit Content-Type header is returned verbatim
//! - Otherwise the type is inferred from the body: JSON documents are
//!   `application/json`, other UTF-8 is `text/plain; charset=utf-8`

use std::borrow::Cow;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http::body::{APPLICATION_JSON, APPLICATION_OCTET_STREAM, TEXT_PLAIN_UTF_8};

/// A fully buffered response produced by a handler.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl MockResponse {
    /// Buffer a handler response, reading at most `limit` body bytes.
    pub async fn from_response(response: Response, limit: usize) -> Result<Self> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, limit).await?;
        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_str(&self.headers, name)
    }

    /// Every value of a header.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Content type as set by the handler, or inferred from the body.
    pub fn content_type(&self) -> &str {
        self.header(header::CONTENT_TYPE.as_str())
            .unwrap_or_else(|| infer_content_type(&self.body))
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body deserialized from JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn json_value(&self) -> Result<serde_json::Value> {
        self.json()
    }

    /// Body markup, unmodified, for whichever XML parser the test uses.
    pub fn xml(&self) -> Cow<'_, str> {
        self.text()
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}

pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Content type a real server would report for an untyped body.
pub fn infer_content_type(body: &[u8]) -> &'static str {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(_)) | Ok(serde_json::Value::Array(_)) => APPLICATION_JSON,
        _ if std::str::from_utf8(body).is_ok() => TEXT_PLAIN_UTF_8,
        _ => APPLICATION_OCTET_STREAM,
    }
}
