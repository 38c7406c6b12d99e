//! Immutable request descriptors.
//!
//! # Responsibilities
//! - Record everything a test configures on an outgoing request
//! - Return a new descriptor from every `with_*` call
//! - Resolve the URL into method, path and query at dispatch time
//!
//! # Design Decisions
//! - Configuration never fails; bad URLs, methods and headers are reported
//!   by the dispatch that tries to use them
//! - Path and query are separated as soon as the URL is resolved
//! - Spaces and non-ASCII characters in the URL are percent-encoded, the way
//!   a browser sends them
//! - Auth, timeout, redirect policy, virtual host and signer are stored only

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use serde::Serialize;
use url::{Position, Url};

use crate::error::{Error, Result};
use crate::http::body::RequestBody;

/// Authentication scheme attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Digest,
    Ntlm,
    Spnego,
    Kerberos,
}

/// Credentials attached with [`RequestDescriptor::with_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth {
    pub username: String,
    pub password: String,
    pub scheme: AuthScheme,
}

/// Computes request signatures (OAuth, AWS SigV4, ...).
///
/// The mock records the signer but never invokes it.
pub trait RequestSigner: Send + Sync {
    /// Short name used in debug output.
    fn name(&self) -> &str;
}

/// Immutable description of a single outgoing mock request.
#[derive(Clone)]
pub struct RequestDescriptor {
    url: String,
    method: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: RequestBody,
    body_error: Option<String>,
    auth: Option<Auth>,
    timeout: Option<Duration>,
    follow_redirects: bool,
    virtual_host: Option<String>,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl RequestDescriptor {
    /// A GET request to `url` with nothing else configured.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET.to_string(),
            headers: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
            body_error: None,
            auth: None,
            timeout: None,
            follow_redirects: true,
            virtual_host: None,
            signer: None,
        }
    }

    fn update(&self, f: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        f(&mut next);
        next
    }

    pub fn with_url(&self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.update(|r| r.url = url)
    }

    /// Set the method, case-sensitive as supplied.
    pub fn with_method(&self, method: impl Into<String>) -> Self {
        let method = method.into();
        self.update(|r| r.method = method)
    }

    /// Append one header, keeping any existing values for the same name.
    pub fn with_header(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let pair = (name.into(), value.into());
        self.update(|r| r.headers.push(pair))
    }

    /// Append headers in iteration order.
    pub fn with_headers<I, K, V>(&self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<_> = headers.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.update(|r| r.headers.extend(pairs))
    }

    /// Append one query parameter.
    pub fn with_query_param(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let pair = (name.into(), value.into());
        self.update(|r| r.query.push(pair))
    }

    /// Append query parameters in iteration order.
    pub fn with_query_string<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<_> = params.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.update(|r| r.query.extend(pairs))
    }

    pub fn with_body(&self, body: impl Into<RequestBody>) -> Self {
        let body = body.into();
        self.update(|r| {
            r.body = body;
            r.body_error = None;
        })
    }

    /// Serialize `value` as a JSON body. A serialization failure is
    /// reported when the request is dispatched.
    pub fn with_json<T: Serialize + ?Sized>(&self, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => self.with_body(value),
            Err(e) => self.update(|r| {
                r.body = RequestBody::Empty;
                r.body_error = Some(e.to_string());
            }),
        }
    }

    pub fn with_auth(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        scheme: AuthScheme,
    ) -> Self {
        let auth = Auth {
            username: username.into(),
            password: password.into(),
            scheme,
        };
        self.update(|r| r.auth = Some(auth))
    }

    pub fn with_follow_redirects(&self, follow: bool) -> Self {
        self.update(|r| r.follow_redirects = follow)
    }

    pub fn with_virtual_host(&self, host: impl Into<String>) -> Self {
        let host = host.into();
        self.update(|r| r.virtual_host = Some(host))
    }

    pub fn with_request_timeout(&self, timeout: Duration) -> Self {
        self.update(|r| r.timeout = Some(timeout))
    }

    pub fn sign(&self, signer: Arc<dyn RequestSigner>) -> Self {
        self.update(|r| r.signer = Some(signer))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Headers in the order they were added, names as supplied.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a header, looked up case-insensitively.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Query parameters added through the builder (not those in the URL).
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn auth(&self) -> Option<&Auth> {
        self.auth.as_ref()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    pub fn virtual_host(&self) -> Option<&str> {
        self.virtual_host.as_deref()
    }

    pub fn signer(&self) -> Option<&Arc<dyn RequestSigner>> {
        self.signer.as_ref()
    }

    /// Resolve method, URL and query into a dispatch target.
    pub fn target(&self) -> Result<Target> {
        if let Some(reason) = &self.body_error {
            return Err(Error::Serialize(reason.clone()));
        }

        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| Error::InvalidMethod(self.method.clone()))?;

        let (url, absolute) = resolve_url(&self.url).map_err(|e| Error::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        let mut query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        query.extend(self.query.iter().cloned());

        let host = match url.host_str() {
            Some(_) if absolute => Some(url[Position::BeforeHost..Position::AfterPort].to_string()),
            _ => None,
        };

        Ok(Target {
            method,
            host,
            path: url.path().to_string(),
            query,
        })
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("auth", &self.auth)
            .field("timeout", &self.timeout)
            .field("follow_redirects", &self.follow_redirects)
            .field("virtual_host", &self.virtual_host)
            .field("signer", &self.signer.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}

/// Base for relative targets; only its path and query survive.
const RELATIVE_BASE: &str = "http://mock.invalid/";

/// Parse `raw` the way a browser would, percent-encoding spaces and
/// non-ASCII characters. Returns whether `raw` was absolute.
fn resolve_url(raw: &str) -> std::result::Result<(Url, bool), url::ParseError> {
    match Url::parse(raw) {
        Ok(url) => Ok((url, true)),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(RELATIVE_BASE)?;
            Ok((base.join(raw)?, false))
        }
        Err(e) => Err(e),
    }
}

/// Method, path and query of a request, separated for routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub method: Method,
    /// Authority of an absolute URL.
    pub host: Option<String>,
    /// Path without the query string.
    pub path: String,
    /// URL query parameters followed by builder parameters, decoded.
    pub query: Vec<(String, String)>,
}

impl Target {
    /// Path and re-encoded query for the synthetic request URI.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{}", self.path, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NamedSigner;

    impl RequestSigner for NamedSigner {
        fn name(&self) -> &str {
            "named"
        }
    }

    #[test]
    fn test_with_calls_leave_receiver_unchanged() {
        let base = RequestDescriptor::new("/get");
        let configured = base
            .with_method("PATCH")
            .with_header("X-One", "1")
            .with_query_param("q", "a");

        assert_eq!(base.method(), "GET");
        assert!(base.headers().is_empty());
        assert!(base.query_params().is_empty());

        assert_eq!(configured.method(), "PATCH");
        assert_eq!(configured.header("x-one"), Some("1"));
        assert_eq!(configured.headers()[0].0, "X-One");
    }

    #[test]
    fn test_headers_and_query_append() {
        let req = RequestDescriptor::new("/")
            .with_header("Accept", "a")
            .with_headers([("accept", "b"), ("X-Other", "c")])
            .with_query_string(vec![("k", "1"), ("k", "2")])
            .with_query_param("z", "3");

        assert_eq!(req.header_all("ACCEPT"), vec!["a", "b"]);
        assert_eq!(req.query_params().len(), 3);
        assert_eq!(req.query_params()[1], ("k".to_string(), "2".to_string()));
    }

    #[test]
    fn test_unenforced_settings_are_stored() {
        let req = RequestDescriptor::new("/")
            .sign(Arc::new(NamedSigner))
            .with_virtual_host("vhost")
            .with_auth("user", "pass", AuthScheme::Digest)
            .with_follow_redirects(false)
            .with_request_timeout(Duration::from_millis(5));

        assert_eq!(req.signer().map(|s| s.name()), Some("named"));
        assert_eq!(req.virtual_host(), Some("vhost"));
        assert_eq!(req.auth().unwrap().scheme, AuthScheme::Digest);
        assert!(!req.follow_redirects());
        assert_eq!(req.request_timeout(), Some(Duration::from_millis(5)));
        assert!(format!("{:?}", req).contains("named"));
    }

    #[test]
    fn test_target_splits_path_and_query() {
        let target = RequestDescriptor::new("http://localhost:9000/search?q=rust&page=2")
            .with_query_param("extra", "x y")
            .target()
            .unwrap();

        assert_eq!(target.method, Method::GET);
        assert_eq!(target.host.as_deref(), Some("localhost:9000"));
        assert_eq!(target.path, "/search");
        assert_eq!(target.query.len(), 3);
        assert_eq!(target.path_and_query(), "/search?q=rust&page=2&extra=x+y");
    }

    #[test]
    fn test_target_relative_urls() {
        assert_eq!(RequestDescriptor::new("get").target().unwrap().path, "/get");
        assert_eq!(RequestDescriptor::new("http://localhost").target().unwrap().path, "/");
        assert_eq!(RequestDescriptor::new("/p").target().unwrap().path_and_query(), "/p");
    }

    #[test]
    fn test_encoded_question_mark_stays_in_path() {
        let target = RequestDescriptor::new("/a%3Fb?c=1").target().unwrap();
        assert_eq!(target.path, "/a%3Fb");
        assert_eq!(target.query, vec![("c".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_target_errors() {
        let err = RequestDescriptor::new("/").with_method("BAD METHOD").target().unwrap_err();
        assert!(matches!(err, Error::InvalidMethod(_)));

        let err = RequestDescriptor::new("http://[bad/get").target().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { ref url, .. } if url == "http://[bad/get"));
    }

    #[test]
    fn test_unencoded_characters_are_encoded() {
        let target = RequestDescriptor::new("/has space").target().unwrap();
        assert_eq!(target.path, "/has%20space");
        assert_eq!(target.host, None);

        let target = RequestDescriptor::new("/café menu?q=crème brûlée").target().unwrap();
        assert_eq!(target.path, "/caf%C3%A9%20menu");
        assert_eq!(target.query, vec![("q".to_string(), "crème brûlée".to_string())]);
        assert!(target.path_and_query().is_ascii());
    }
}
