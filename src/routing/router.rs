//! Route table lookup.
//!
//! # Responsibilities
//! - Store routes in declaration order
//! - Look up the first route accepting a method and path
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) ordered scan; declaration order is precedence
//! - A missing route is not an error here; the dispatcher reports it

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tower::{Service, ServiceExt};

use crate::routing::matcher::{Matcher, MethodMatcher, PathMatcher};

/// Type-erased handler simulating the server side of one route.
pub type Handler = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// A single route: method and path conditions plus the handler they guard.
pub struct Route {
    method: MethodMatcher,
    path: PathMatcher,
    handler: Handler,
}

impl Route {
    fn new(method: MethodMatcher, path: PathMatcher, handler: Handler) -> Self {
        Self {
            method,
            path,
            handler,
        }
    }

    /// The method condition of this route.
    pub fn method(&self) -> &MethodMatcher {
        &self.method
    }

    /// The path condition of this route.
    pub fn path(&self) -> &PathMatcher {
        &self.path
    }

    /// Returns true if both the method and the path condition accept.
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.matches(method, path) && self.path.matches(method, path)
    }

    /// A handle to the route's handler.
    pub fn handler(&self) -> Handler {
        self.handler.clone()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Ordered, immutable table of routes. The first matching route wins.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Start building a route table.
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Find the first route accepting this method and path.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(method, path))
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the table holds no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in precedence order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

/// Collects routes in declaration order.
#[derive(Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
    fallback: Option<Handler>,
}

impl RouteTableBuilder {
    /// Add a route served by an async function.
    ///
    /// ```
    /// use mock_ws::RouteTable;
    ///
    /// let table = RouteTable::builder()
    ///     .route("GET", "/get", |_req| async { "get ok" })
    ///     .route("POST", "/post", |_req| async { "post ok" })
    ///     .build();
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn route<F, Fut, R>(
        mut self,
        method: impl Into<MethodMatcher>,
        path: impl Into<PathMatcher>,
        handler: F,
    ) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.routes
            .push(Route::new(method.into(), path.into(), boxed_handler(handler)));
        self
    }

    /// Add a route served by a tower service, e.g. a complete `axum::Router`.
    pub fn route_service<S, R>(
        mut self,
        method: impl Into<MethodMatcher>,
        path: impl Into<PathMatcher>,
        service: S,
    ) -> Self
    where
        S: Service<Request<Body>, Response = R, Error = Infallible> + Clone + Send + Sync + 'static,
        S::Future: Send + 'static,
        R: IntoResponse,
    {
        let handler = move |req: Request<Body>| service.clone().oneshot(req);
        self.routes
            .push(Route::new(method.into(), path.into(), boxed_handler(handler)));
        self
    }

    /// Catch-all handler consulted after every declared route.
    pub fn fallback<F, Fut, R>(mut self, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.fallback = Some(boxed_handler(handler));
        self
    }

    /// Freeze the table.
    pub fn build(mut self) -> RouteTable {
        if let Some(handler) = self.fallback.take() {
            self.routes
                .push(Route::new(MethodMatcher::Any, PathMatcher::Any, handler));
        }
        RouteTable {
            routes: self.routes,
        }
    }
}

fn boxed_handler<F, Fut, R>(handler: F) -> Handler
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |req: Request<Body>| handler(req).map(|res| res.into_response()).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn table() -> RouteTable {
        RouteTable::builder()
            .route("GET", "/get", |_req| async { "get ok" })
            .route("POST", "/post", |_req| async { "post ok" })
            .route("GET", "/get", |_req| async { "shadowed" })
            .fallback(|_req| async { (StatusCode::IM_A_TEAPOT, "fallback") })
            .build()
    }

    #[test]
    fn test_first_match_wins() {
        let table = table();
        assert_eq!(table.len(), 4);

        let route = table.match_route(&Method::GET, "/get").unwrap();
        assert_eq!(route.path(), &PathMatcher::exact("/get"));
        assert!(std::ptr::eq(route, table.routes().next().unwrap()));
    }

    #[test]
    fn test_fallback_is_last() {
        let table = table();
        let route = table.match_route(&Method::DELETE, "/get").unwrap();
        assert_eq!(route.method(), &MethodMatcher::Any);
        assert_eq!(route.path(), &PathMatcher::Any);
    }

    #[test]
    fn test_no_match() {
        let table = RouteTable::builder()
            .route("GET", "/get", |_req| async { "get ok" })
            .build();
        assert!(table.match_route(&Method::DELETE, "/get").is_none());
        assert!(table.match_route(&Method::GET, "/other").is_none());
        assert!(RouteTable::default().is_empty());
    }

    #[test]
    fn test_route_needs_method_and_path() {
        let table = table();
        let route = table.routes().next().unwrap();
        assert!(route.matches(&Method::GET, "/get"));
        assert!(!route.matches(&Method::POST, "/get"));
        assert!(!route.matches(&Method::GET, "/post"));
    }

    #[tokio::test]
    async fn test_handler_invocation() {
        let table = table();
        let handler = table.match_route(&Method::POST, "/post").unwrap().handler();
        let response = handler(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"post ok");
    }
}
