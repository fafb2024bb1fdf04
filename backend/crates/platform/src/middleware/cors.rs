//! CORS stage
//!
//! Requests without an `Origin` header pass untouched. A request whose
//! origin is not on the allow-list is refused with 403. Preflight `OPTIONS`
//! requests are answered here with 204 and never reach the handlers.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;

use super::pipeline::{Policy, RequestContext};

/// Client message for a refused origin
pub const ORIGIN_NOT_ALLOWED: &str = "Not allowed by CORS";

const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const MAX_AGE: &str = "86400";
const EXPOSE_HEADERS: &str = "Authorization";

/// Allowed browser origins, compared exactly
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    /// Parse a comma separated list; blanks are dropped
    pub fn from_csv(csv: &str) -> Self {
        Self::new(
            csv.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    config: CorsConfig,
}

impl CorsPolicy {
    pub fn new(config: CorsConfig) -> Self {
        Self { config }
    }
}

fn set_cors_headers(headers: &mut HeaderMap, origin: &HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(EXPOSE_HEADERS),
    );
}

impl Policy for CorsPolicy {
    fn name(&self) -> &'static str {
        "cors"
    }

    fn on_request(&self, ctx: &RequestContext, _req: &mut Request<Body>) -> Result<(), Response> {
        if let Some(origin) = &ctx.origin {
            let allowed = origin
                .to_str()
                .is_ok_and(|origin| self.config.is_allowed(origin));
            if !allowed {
                tracing::warn!(origin = ?origin, path = %ctx.path, "Origin refused");
                return Err(AppError::forbidden(ORIGIN_NOT_ALLOWED).into_response());
            }
        }

        if ctx.method == Method::OPTIONS {
            let mut response = StatusCode::NO_CONTENT.into_response();
            if let Some(origin) = &ctx.origin {
                set_cors_headers(response.headers_mut(), origin);
            }
            return Err(response);
        }

        Ok(())
    }

    fn on_response(&self, ctx: &RequestContext, res: &mut Response) {
        if let Some(origin) = &ctx.origin {
            set_cors_headers(res.headers_mut(), origin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::pipeline::Pipeline;

    fn pipeline() -> Pipeline {
        Pipeline::builder()
            .stage(CorsPolicy::new(CorsConfig::from_csv(
                "https://github.com, http://localhost:8080,,",
            )))
            .build()
    }

    async fn send(req: Request<Body>) -> Response {
        pipeline()
            .run_with(req, |_req| async { StatusCode::OK.into_response() })
            .await
    }

    #[test]
    fn test_from_csv_trims_and_drops_blanks() {
        let config = CorsConfig::from_csv(" https://a.example , ,https://b.example");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[tokio::test]
    async fn test_no_origin_passes_without_headers() {
        let response = send(Request::get("/").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[tokio::test]
    async fn test_allowed_origin_is_echoed() {
        let req = Request::get("/")
            .header(header::ORIGIN, "https://github.com")
            .body(Body::empty())
            .unwrap();
        let response = send(req).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://github.com");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }

    #[tokio::test]
    async fn test_unknown_origin_is_forbidden() {
        let req = Request::get("/")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = send(req).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let req = Request::options("/teachers")
            .header(header::ORIGIN, "http://localhost:8080")
            .body(Body::empty())
            .unwrap();
        let response = send(req).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8080"
        );
    }
}
