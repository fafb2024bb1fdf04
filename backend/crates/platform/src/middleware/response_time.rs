//! Response time stage
//!
//! Stamps `X-Response-Time` on every response that passes back through it
//! and logs the request line.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::response::Response;

use super::pipeline::{Policy, RequestContext};

pub const X_RESPONSE_TIME: HeaderName = HeaderName::from_static("x-response-time");

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseTimePolicy;

impl Policy for ResponseTimePolicy {
    fn name(&self) -> &'static str {
        "response_time"
    }

    fn on_request(&self, _ctx: &RequestContext, _req: &mut Request<Body>) -> Result<(), Response> {
        Ok(())
    }

    fn on_response(&self, ctx: &RequestContext, res: &mut Response) {
        let elapsed = ctx.started_at.elapsed();

        if let Ok(value) = HeaderValue::from_str(&format!("{elapsed:?}")) {
            res.headers_mut().insert(X_RESPONSE_TIME, value);
        }

        tracing::info!(
            method = %ctx.method,
            path = %ctx.path,
            status = res.status().as_u16(),
            duration_ms = elapsed.as_secs_f64() * 1000.0,
            "Request completed"
        );
    }
}
