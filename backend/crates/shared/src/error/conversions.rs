//! HTTP rendering of [`AppError`]
//!
//! Errors go out as RFC 7807 problem documents with the
//! `application/problem+json` media type.

use serde::Serialize;

use super::app_error::AppError;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 7807 body; `type` is always `about:blank`, so `title` is the
/// status reason phrase
#[derive(Debug, Serialize)]
pub struct ProblemDetails<'a> {
    #[serde(rename = "type")]
    pub problem_type: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: &'a str,
}

impl AppError {
    pub fn problem(&self) -> ProblemDetails<'_> {
        ProblemDetails {
            problem_type: "about:blank",
            title: self.kind().title(),
            status: self.status_code(),
            detail: self.message(),
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(self.problem())).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_problem_body() {
        let err = AppError::new(ErrorKind::Unauthorized, "authorization cookie missing");
        let body = serde_json::to_value(err.problem()).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "type": "about:blank",
                "title": "Unauthorized",
                "status": 401,
                "detail": "authorization cookie missing",
            })
        );
    }

    #[cfg(feature = "axum")]
    #[tokio::test]
    async fn test_into_response() {
        use axum::response::IntoResponse;

        let response = AppError::too_many_requests("Too many requests").into_response();
        assert_eq!(response.status().as_u16(), 429);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            PROBLEM_CONTENT_TYPE
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], "Too many requests");
    }
}
