//! HTTP Handlers

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use platform::cookie::{delete_cookie_header, set_cookie_header};
use tokio::sync::Mutex;

use crate::application::config::AuthConfig;
use crate::application::{CreateAccountsUseCase, NewAccountInput, SignInInput, SignInUseCase};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CreateExecsRequest, CreateExecsResponse, LoginRequest, LoginResponse, LogoutResponse,
    MeResponse, STATUS_SUCCESS,
};
use crate::presentation::middleware::AuthClaims;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    /// Serializes bulk account creation
    pub create_lock: Arc<Mutex<()>>,
}

impl<R> Clone for AuthAppState<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            config: Arc::clone(&self.config),
            create_lock: Arc::clone(&self.create_lock),
        }
    }
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /execs/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let Json(req) = body?;
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    let cookie = set_cookie_header(&state.config.cookie, &output.token)
        .ok_or_else(|| AuthError::Internal("token is not a valid cookie value".to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            status: STATUS_SUCCESS,
            token: output.token,
        }),
    )
        .into_response())
}

/// POST /execs/logout
///
/// Clears the cookie only; the token itself stays valid until it expires.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> AuthResult<Response>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let cookie = delete_cookie_header(&state.config.cookie)
        .ok_or_else(|| AuthError::Internal("invalid cookie configuration".to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse {
            status: "Logged out successfully",
        }),
    )
        .into_response())
}

// ============================================================================
// Exec creation
// ============================================================================

/// POST /execs
pub async fn create_execs<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<CreateExecsRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<CreateExecsResponse>)>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let Json(req) = body?;
    let use_case =
        CreateAccountsUseCase::with_lock(state.repo.clone(), state.create_lock.clone());

    let inputs = req
        .execs
        .into_iter()
        .map(|exec| NewAccountInput {
            first_name: exec.first_name,
            last_name: exec.last_name,
            email: exec.email,
            username: exec.username,
            password: exec.password,
            role: exec.role,
        })
        .collect();

    let created = use_case.execute(inputs).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateExecsResponse {
            status: STATUS_SUCCESS,
            count: created.len(),
            data: created,
        }),
    ))
}

// ============================================================================
// Current identity
// ============================================================================

/// GET /execs/me
pub async fn me(Extension(claims): Extension<AuthClaims>) -> Json<MeResponse> {
    Json(MeResponse::from(claims))
}
