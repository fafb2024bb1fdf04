//! Router and pipeline assembly

use std::sync::Arc;

use auth::application::{CreateAccountsUseCase, NewAccountInput};
use auth::{AuthConfig, AuthPolicy, auth_router};
use axum::{Router, middleware};
use kernel::error::app_error::AppError;
use platform::middleware::{
    CorsConfig, CorsPolicy, Pipeline, RateLimitPolicy, ResponseTimePolicy, SecurityHeadersPolicy,
    apply_pipeline,
};
use platform::rate_limit::FixedWindowRateLimiter;
use school::{Exec, MemoryStore, school_router};

use crate::config::BootstrapExec;

const BOOTSTRAP_ROLE: &str = "admin";

/// The request pipeline, in its fixed order
pub fn build_pipeline(
    limiter: Arc<FixedWindowRateLimiter>,
    cors: CorsConfig,
    auth: Arc<AuthConfig>,
) -> Pipeline {
    Pipeline::builder()
        .stage(RateLimitPolicy::new(limiter))
        .stage(ResponseTimePolicy)
        .stage(SecurityHeadersPolicy)
        .stage(CorsPolicy::new(cors))
        .stage(AuthPolicy::new(auth))
        .build()
}

/// Every route behind the pipeline
///
/// `execs` is shared between the account routes and the record routes.
pub fn build_app(pipeline: Pipeline, auth: Arc<AuthConfig>, execs: MemoryStore<Exec>) -> Router {
    tracing::debug!(stages = ?pipeline.stage_names(), "Request pipeline");

    Router::new()
        .merge(auth_router(Arc::new(execs.clone()), auth))
        .merge(school_router(MemoryStore::new(), MemoryStore::new(), execs))
        .fallback(|| async { AppError::not_found("route not found") })
        .layer(middleware::from_fn_with_state(
            Arc::new(pipeline),
            apply_pipeline,
        ))
}

/// Create the startup exec account
pub async fn seed_bootstrap_exec(
    execs: &MemoryStore<Exec>,
    bootstrap: &BootstrapExec,
) -> Result<Exec, auth::AuthError> {
    let created = CreateAccountsUseCase::new(Arc::new(execs.clone()))
        .execute(vec![NewAccountInput {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            username: bootstrap.username.clone(),
            password: bootstrap.password.clone(),
            role: BOOTSTRAP_ROLE.to_string(),
        }])
        .await?;

    created
        .into_iter()
        .next()
        .ok_or_else(|| auth::AuthError::Internal("bootstrap exec was not created".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn app() -> Router {
        let config = ServerConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some("test-secret".to_string()),
            "BOOTSTRAP_EXEC_USERNAME" => Some("admin".to_string()),
            "BOOTSTRAP_EXEC_PASSWORD" => Some("changeme".to_string()),
            _ => None,
        })
        .unwrap();

        let execs = MemoryStore::new();
        seed_bootstrap_exec(&execs, config.bootstrap_exec.as_ref().unwrap())
            .await
            .unwrap();

        let auth = Arc::new(config.auth);
        let limiter = Arc::new(FixedWindowRateLimiter::new(config.rate_limit));
        let pipeline = build_pipeline(limiter, config.cors, Arc::clone(&auth));
        build_app(pipeline, auth, execs)
    }

    #[test]
    fn test_pipeline_order() {
        let limiter = Arc::new(FixedWindowRateLimiter::new(Default::default()));
        let pipeline = build_pipeline(
            limiter,
            CorsConfig::default(),
            Arc::new(AuthConfig::development()),
        );

        assert_eq!(
            pipeline.stage_names(),
            vec!["rate_limit", "response_time", "security_headers", "cors", "auth"]
        );
    }

    #[tokio::test]
    async fn test_bootstrap_exec_can_log_in_and_create_records() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/execs/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "username": "admin", "password": "changeme" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let cookie = cookie.split(';').next().unwrap().to_string();

        let response = app
            .oneshot(
                Request::post("/students")
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!([{ "first_name": "Ann", "last_name": "Lee", "class": "9A" }])
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_problem_json() {
        let app = app().await;

        let response = app
            .oneshot(Request::get("/docs/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 404);
    }
}
