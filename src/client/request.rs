//! Chainable requests bound to a client.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use serde::Serialize;

use crate::client::MockClient;
use crate::error::Result;
use crate::http::body::RequestBody;
use crate::http::request::{AuthScheme, RequestDescriptor, RequestSigner};
use crate::http::response::MockResponse;
use crate::http::stream::StreamedResponse;

/// A request descriptor plus the client that will dispatch it.
///
/// Every `with_*` call returns a new request; the receiver is unchanged,
/// so a partially configured request can be reused as a template.
/// Accessors come from [`RequestDescriptor`] through `Deref`.
#[derive(Debug, Clone)]
pub struct MockRequest {
    client: MockClient,
    descriptor: RequestDescriptor,
}

impl MockRequest {
    pub(crate) fn new(client: MockClient, descriptor: RequestDescriptor) -> Self {
        Self { client, descriptor }
    }

    fn map(&self, f: impl FnOnce(&RequestDescriptor) -> RequestDescriptor) -> Self {
        Self {
            client: self.client.clone(),
            descriptor: f(&self.descriptor),
        }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn with_url(&self, url: impl Into<String>) -> Self {
        self.map(|d| d.with_url(url))
    }

    pub fn with_method(&self, method: impl Into<String>) -> Self {
        self.map(|d| d.with_method(method))
    }

    pub fn with_header(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|d| d.with_header(name, value))
    }

    pub fn with_headers<I, K, V>(&self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.map(|d| d.with_headers(headers))
    }

    pub fn with_query_param(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|d| d.with_query_param(name, value))
    }

    pub fn with_query_string<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.map(|d| d.with_query_string(params))
    }

    pub fn with_body(&self, body: impl Into<RequestBody>) -> Self {
        self.map(|d| d.with_body(body))
    }

    pub fn with_json<T: Serialize + ?Sized>(&self, value: &T) -> Self {
        self.map(|d| d.with_json(value))
    }

    pub fn with_auth(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        scheme: AuthScheme,
    ) -> Self {
        self.map(|d| d.with_auth(username, password, scheme))
    }

    pub fn with_follow_redirects(&self, follow: bool) -> Self {
        self.map(|d| d.with_follow_redirects(follow))
    }

    pub fn with_virtual_host(&self, host: impl Into<String>) -> Self {
        self.map(|d| d.with_virtual_host(host))
    }

    pub fn with_request_timeout(&self, timeout: Duration) -> Self {
        self.map(|d| d.with_request_timeout(timeout))
    }

    pub fn sign(&self, signer: Arc<dyn RequestSigner>) -> Self {
        self.map(|d| d.sign(signer))
    }

    pub async fn get(&self) -> Result<MockResponse> {
        self.execute_with(Method::GET.as_str()).await
    }

    pub async fn head(&self) -> Result<MockResponse> {
        self.execute_with(Method::HEAD.as_str()).await
    }

    pub async fn options(&self) -> Result<MockResponse> {
        self.execute_with(Method::OPTIONS.as_str()).await
    }

    pub async fn delete(&self) -> Result<MockResponse> {
        self.execute_with(Method::DELETE.as_str()).await
    }

    pub async fn post(&self, body: impl Into<RequestBody>) -> Result<MockResponse> {
        self.with_body(body).execute_with(Method::POST.as_str()).await
    }

    pub async fn put(&self, body: impl Into<RequestBody>) -> Result<MockResponse> {
        self.with_body(body).execute_with(Method::PUT.as_str()).await
    }

    pub async fn patch(&self, body: impl Into<RequestBody>) -> Result<MockResponse> {
        self.with_body(body).execute_with(Method::PATCH.as_str()).await
    }

    /// Dispatch with the configured method (GET unless set).
    pub async fn execute(&self) -> Result<MockResponse> {
        self.client.execute(self.descriptor.clone()).await
    }

    /// Dispatch with an explicit method.
    pub async fn execute_with(&self, method: impl Into<String>) -> Result<MockResponse> {
        self.with_method(method).execute().await
    }

    /// Dispatch with the configured method, exposing the body as a stream.
    pub async fn stream(&self) -> Result<StreamedResponse> {
        self.client.stream(self.descriptor.clone()).await
    }
}

impl Deref for MockRequest {
    type Target = RequestDescriptor;

    fn deref(&self) -> &Self::Target {
        &self.descriptor
    }
}
