//! Router module
//!
//! An explicitly constructed route table mapping (method, path pattern) pairs
//! to async handlers. Routes are scanned in registration order and the first
//! match wins, so re-registering a pattern shadows the later entry.

mod pattern;

pub use pattern::PathPattern;

use hyper::Method;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::request::ApiRequest;
use crate::api::response::JsonResponse;

/// Boxed future a handler returns
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<JsonResponse, ApiError>> + Send>>;

/// A registered handler function
pub type RouteHandler = Arc<dyn Fn(ApiRequest) -> HandlerFuture + Send + Sync>;

struct Route {
    method: Method,
    pattern: PathPattern,
    handler: RouteHandler,
}

/// Result of looking up a request in the route table
pub enum RouteLookup {
    /// A route matched; run its handler with the captured parameters
    Found {
        handler: RouteHandler,
        params: HashMap<String, String>,
    },
    /// The path is known but not for this method
    MethodNotAllowed { allowed: Vec<Method> },
    /// No route matches the path
    NotFound,
}

/// Ordered route table. Built once at start-up and passed to the server;
/// never mutated afterwards.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a handler for a method and path pattern
    pub fn route<H, Fut>(mut self, method: Method, pattern: &str, handler: H) -> Self
    where
        H: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonResponse, ApiError>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(pattern),
            handler: Arc::new(move |req| -> HandlerFuture { Box::pin(handler(req)) }),
        });
        self
    }

    pub fn get<H, Fut>(self, pattern: &str, handler: H) -> Self
    where
        H: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonResponse, ApiError>> + Send + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<H, Fut>(self, pattern: &str, handler: H) -> Self
    where
        H: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonResponse, ApiError>> + Send + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    /// Find the first route matching method and path.
    ///
    /// When the path matches some pattern but no registered method does, the
    /// lookup reports the methods that would have matched so the caller can
    /// build an Allow header.
    pub fn find(&self, method: &Method, path: &str) -> RouteLookup {
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            if let Some(params) = route.pattern.matches(path) {
                if route.method == *method {
                    return RouteLookup::Found {
                        handler: Arc::clone(&route.handler),
                        params,
                    };
                }
                if !allowed.contains(&route.method) {
                    allowed.push(route.method.clone());
                }
            }
        }

        if allowed.is_empty() {
            RouteLookup::NotFound
        } else {
            RouteLookup::MethodNotAllowed { allowed }
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Bytes;
    use hyper::StatusCode;

    fn test_router() -> Router {
        Router::new()
            .get("/api/hello", |_req| async {
                Ok(JsonResponse::ok(serde_json::json!({"message": "hello"})))
            })
            .get("/api/users/:id", |req| async move {
                let id = req.param("id").unwrap_or("").to_string();
                Ok(JsonResponse::ok(serde_json::json!({"id": id})))
            })
            .post("/api/echo", |req| async move {
                let value: serde_json::Value = req.json()?;
                Ok(JsonResponse::ok(value))
            })
    }

    fn request(method: Method, path: &str, params: HashMap<String, String>) -> ApiRequest {
        ApiRequest::new(method, path.to_string(), params, Bytes::new())
    }

    #[tokio::test]
    async fn test_dispatch_exact() {
        let router = test_router();
        let RouteLookup::Found { handler, params } = router.find(&Method::GET, "/api/hello")
        else {
            panic!("expected a match for GET /api/hello");
        };
        assert!(params.is_empty());

        let resp = handler(request(Method::GET, "/api/hello", params))
            .await
            .expect("handler should succeed");
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["message"], "hello");
    }

    #[tokio::test]
    async fn test_dispatch_with_param() {
        let router = test_router();
        let RouteLookup::Found { handler, params } = router.find(&Method::GET, "/api/users/7")
        else {
            panic!("expected a match for GET /api/users/7");
        };
        assert_eq!(params.get("id").map(String::as_str), Some("7"));

        let resp = handler(request(Method::GET, "/api/users/7", params))
            .await
            .expect("handler should succeed");
        assert_eq!(resp.body["id"], "7");
    }

    #[test]
    fn test_method_not_allowed() {
        let router = test_router();
        let RouteLookup::MethodNotAllowed { allowed } = router.find(&Method::DELETE, "/api/hello")
        else {
            panic!("expected MethodNotAllowed");
        };
        assert_eq!(allowed, vec![Method::GET]);
    }

    #[test]
    fn test_not_found() {
        let router = test_router();
        assert!(matches!(
            router.find(&Method::GET, "/nope"),
            RouteLookup::NotFound
        ));
    }

    #[tokio::test]
    async fn test_first_registration_wins() {
        let router = Router::new()
            .get("/dup", |_req| async {
                Ok(JsonResponse::ok(serde_json::json!({"which": "first"})))
            })
            .get("/dup", |_req| async {
                Ok(JsonResponse::ok(serde_json::json!({"which": "second"})))
            });
        assert_eq!(router.len(), 2);

        let RouteLookup::Found { handler, params } = router.find(&Method::GET, "/dup") else {
            panic!("expected a match for GET /dup");
        };
        let resp = handler(request(Method::GET, "/dup", params))
            .await
            .expect("handler should succeed");
        assert_eq!(resp.body["which"], "first");
    }
}
