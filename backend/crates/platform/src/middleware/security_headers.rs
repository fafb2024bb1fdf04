//! Security headers stage

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request, header};
use axum::response::Response;

use super::pipeline::{Policy, RequestContext};

const X_DNS_PREFETCH_CONTROL: HeaderName = HeaderName::from_static("x-dns-prefetch-control");

const SECURITY_HEADERS: [(HeaderName, &str); 6] = [
    (X_DNS_PREFETCH_CONTROL, "off"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=63072000; includeSubDomains; preload",
    ),
    (header::REFERRER_POLICY, "no-referrer"),
];

/// Adds the fixed set of browser hardening headers to every response
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeadersPolicy;

impl Policy for SecurityHeadersPolicy {
    fn name(&self) -> &'static str {
        "security_headers"
    }

    fn on_request(&self, _ctx: &RequestContext, _req: &mut Request<Body>) -> Result<(), Response> {
        Ok(())
    }

    fn on_response(&self, _ctx: &RequestContext, res: &mut Response) {
        let headers = res.headers_mut();
        for (name, value) in SECURITY_HEADERS {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }
}
