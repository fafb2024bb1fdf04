//! Rate limit stage

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;

use super::pipeline::{Policy, RequestContext};
use crate::client::client_key;
use crate::rate_limit::{FixedWindowRateLimiter, RateLimitDecision};

/// Client message for a limited request
pub const TOO_MANY_REQUESTS: &str = "Too many requests";

/// Rejects with 429 once a client exceeds its budget for the window
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    limiter: Arc<FixedWindowRateLimiter>,
}

impl RateLimitPolicy {
    pub fn new(limiter: Arc<FixedWindowRateLimiter>) -> Self {
        Self { limiter }
    }
}

impl Policy for RateLimitPolicy {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    fn on_request(&self, ctx: &RequestContext, req: &mut Request<Body>) -> Result<(), Response> {
        let client = client_key(req);
        match self.limiter.allow(&client) {
            RateLimitDecision::Allowed => Ok(()),
            RateLimitDecision::Limited => {
                tracing::warn!(client = %client, path = %ctx.path, "Rate limit exceeded");
                Err(AppError::too_many_requests(TOO_MANY_REQUESTS).into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::pipeline::{Pipeline, apply_pipeline};
    use crate::rate_limit::RateLimitConfig;
    use axum::extract::ConnectInfo;
    use axum::http::StatusCode;
    use axum::{Router, middleware, routing::get};
    use std::net::SocketAddr;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(max_requests: u32) -> Router {
        let limiter = Arc::new(FixedWindowRateLimiter::new(RateLimitConfig::new(
            max_requests,
            Duration::from_secs(60),
        )));
        let pipeline = Pipeline::builder()
            .stage(RateLimitPolicy::new(limiter))
            .build();

        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                Arc::new(pipeline),
                apply_pipeline,
            ))
    }

    fn request_from(addr: &str) -> Request<Body> {
        let mut req = Request::get("/").body(Body::empty()).unwrap();
        let addr: SocketAddr = addr.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        req
    }

    #[tokio::test]
    async fn test_limit_returns_429() {
        let app = app(2);

        for _ in 0..2 {
            let response = app.clone().oneshot(request_from("10.0.0.1:1000")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(request_from("10.0.0.1:1001")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = app.oneshot(request_from("10.0.0.2:1000")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
