use std::future::Future;
use std::sync::Arc;

use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;

// ============================================================================
// Route Table - Explicit Method + Pattern + Priority Registry
// ============================================================================
//
// Serve-time handlers register routes here instead of against the HTTP
// server directly, so components can query existing registrations (the
// idempotent catch-all guard) and so priority ordering is explicit:
// materialization sorts ascending, which makes numerically large priorities
// last-resort routes.
//
// ============================================================================

pub type RouteHandler =
    Arc<dyn Fn(HttpRequest, web::Bytes) -> LocalBoxFuture<'static, HttpResponse> + Send + Sync>;

/// Wrap a request-only async fn into a boxed route handler.
pub fn handler<F, Fut>(f: F) -> RouteHandler
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + 'static,
{
    Arc::new(move |req, _body| -> LocalBoxFuture<'static, HttpResponse> { Box::pin(f(req)) })
}

/// Wrap an async fn that also wants the raw request body.
pub fn handler_with_body<F, Fut>(f: F) -> RouteHandler
where
    F: Fn(HttpRequest, web::Bytes) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + 'static,
{
    Arc::new(move |req, body| -> LocalBoxFuture<'static, HttpResponse> { Box::pin(f(req, body)) })
}

pub struct Route {
    pub method: Method,
    pub pattern: String,
    pub priority: i32,
    handler: RouteHandler,
}

#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a GET route at the default priority.
    pub fn get(&mut self, pattern: &str, handler: RouteHandler) {
        self.register(Method::GET, pattern, 0, handler);
    }

    /// Register a POST route at the default priority.
    pub fn post(&mut self, pattern: &str, handler: RouteHandler) {
        self.register(Method::POST, pattern, 0, handler);
    }

    pub fn register(&mut self, method: Method, pattern: &str, priority: i32, handler: RouteHandler) {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            priority,
            handler,
        });
    }

    /// Exact method+pattern lookup, used by components as an
    /// idempotent-registration guard.
    pub fn has_route(&self, method: &Method, pattern: &str) -> bool {
        self.routes
            .iter()
            .any(|r| r.method == *method && r.pattern == pattern)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in dispatch order: ascending priority, stable for ties.
    fn sorted(&self) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self.routes.iter().collect();
        routes.sort_by_key(|r| r.priority);
        routes
    }

    /// Materialize the table into an actix service config. Registration
    /// order decides match order, so last-resort routes land last.
    pub fn apply(&self, cfg: &mut web::ServiceConfig) {
        for route in self.sorted() {
            let handler = route.handler.clone();
            cfg.route(
                &route.pattern,
                web::method(route.method.clone()).to(
                    move |req: HttpRequest, body: web::Bytes| {
                        let handler = handler.clone();
                        async move { handler(req, body).await }
                    },
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;

    fn text_handler(body: &'static str) -> RouteHandler {
        handler(move |_req| async move { HttpResponse::Ok().body(body) })
    }

    #[test]
    fn test_has_route_matches_method_and_pattern() {
        let mut router = Router::new();
        router.get("/a", text_handler("a"));

        assert!(router.has_route(&Method::GET, "/a"));
        assert!(!router.has_route(&Method::POST, "/a"));
        assert!(!router.has_route(&Method::GET, "/b"));
    }

    #[test]
    fn test_sorted_puts_large_priorities_last() {
        let mut router = Router::new();
        router.register(Method::GET, "/fallback", 999, text_handler("fallback"));
        router.get("/first", text_handler("first"));
        router.register(Method::GET, "/early", -1, text_handler("early"));

        let patterns: Vec<&str> = router.sorted().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["/early", "/first", "/fallback"]);
    }

    #[actix_web::test]
    async fn test_specific_route_wins_over_catch_all() {
        let mut router = Router::new();
        router.register(Method::GET, "/{path:.*}", 999, text_handler("fallback"));
        router.get("/hello", text_handler("specific"));

        let srv =
            actix_test::init_service(actix_web::App::new().configure(|cfg| router.apply(cfg))).await;

        let req = actix_test::TestRequest::get().uri("/hello").to_request();
        let body = actix_test::call_and_read_body(&srv, req).await;
        assert_eq!(&body[..], b"specific");

        let req = actix_test::TestRequest::get().uri("/anything/else").to_request();
        let body = actix_test::call_and_read_body(&srv, req).await;
        assert_eq!(&body[..], b"fallback");
    }
}
