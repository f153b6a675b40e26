//! Middleware chain builder for the HTTP runner.
//!
//! # Responsibilities
//! - Turn an application's routes into an axum `Router`
//! - Wrap it with the builder defaults, then the application's declared
//!   middleware, using tower-http layers
//!
//! # Design Decisions
//! - Declared order is outermost first; defaults sit outside the
//!   application's own middleware
//! - Request IDs are UUID v4, set on the request and echoed on the response

use std::sync::Arc;

use axum::http::Request;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::error::BoxError;
use crate::pipeline::{Application, Middleware, MiddlewareBuilder};
use crate::resolver::AppClass;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Builds an axum `Router` from an application and its declared middleware.
#[derive(Debug, Clone)]
pub struct LayeredBuilder {
    defaults: Vec<Middleware>,
}

impl LayeredBuilder {
    /// A builder applying `defaults` outside every application's middleware.
    pub fn new(defaults: Vec<Middleware>) -> Self {
        Self { defaults }
    }

    /// The middleware applied to `app`, outermost first.
    pub fn stack_for(&self, app: &dyn Application) -> Vec<Middleware> {
        let mut stack = self.defaults.clone();
        stack.extend(app.middleware());
        stack
    }
}

impl Default for LayeredBuilder {
    fn default() -> Self {
        Self::new(vec![Middleware::RequestId, Middleware::Trace])
    }
}

impl MiddlewareBuilder for LayeredBuilder {
    type Chain = Router;

    fn build(&self, class: &AppClass, app: Arc<dyn Application>) -> Result<Router, BoxError> {
        let stack = self.stack_for(app.as_ref());
        let router = stack.iter().rev().fold(app.routes(), |router, middleware| apply(router, *middleware));
        tracing::debug!(class = %class, middleware = ?stack, "Built middleware chain");
        Ok(router)
    }
}

/// Wrap `router` in one middleware layer.
#[allow(deprecated)]
pub(crate) fn apply(router: Router, middleware: Middleware) -> Router {
    match middleware {
        Middleware::RequestId => router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id()),
        ),
        Middleware::Trace => router.layer(TraceLayer::new_for_http()),
        Middleware::Timeout(duration) => router.layer(TimeoutLayer::new(duration)),
        Middleware::BodyLimit(bytes) => router.layer(RequestBodyLimitLayer::new(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Default)]
    struct Echo;

    impl Application for Echo {
        fn routes(self: Arc<Self>) -> Router {
            Router::new()
                .route("/", get(|| async { "hello" }))
                .route("/echo", post(|body: String| async move { body }))
        }

        fn middleware(&self) -> Vec<Middleware> {
            vec![Middleware::Timeout(Duration::from_secs(5)), Middleware::BodyLimit(8)]
        }
    }

    fn chain() -> Router {
        let class = AppClass::of::<Echo>("Echo");
        LayeredBuilder::default().build(&class, class.instantiate()).unwrap()
    }

    #[test]
    fn test_stack_order() {
        let stack = LayeredBuilder::default().stack_for(&Echo);
        assert_eq!(
            stack,
            vec![
                Middleware::RequestId,
                Middleware::Trace,
                Middleware::Timeout(Duration::from_secs(5)),
                Middleware::BodyLimit(8),
            ]
        );
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = chain()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id = response.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_existing_request_id_is_kept() {
        let response = chain()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(X_REQUEST_ID, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_declared_body_limit_applies() {
        let ok = chain()
            .oneshot(Request::post("/echo").body(Body::from("tiny")).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let too_big = chain()
            .oneshot(
                Request::post("/echo")
                    .header("content-length", "13")
                    .body(Body::from("far too large"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(too_big.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
