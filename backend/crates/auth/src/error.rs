//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every variant maps to one fixed client
//! message; the detail carried by a variant is only ever logged.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use platform::token::TokenError;
use school::SchoolError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password missing/blank
    #[error("Missing username or password")]
    MissingCredentials,

    /// Body is not JSON or does not fit the request type
    #[error("Unreadable request body: {0}")]
    InvalidBody(String),

    /// Stored password record is not `salt.hash`
    #[error("Stored password hash has an invalid format")]
    InvalidHashFormat,

    /// Unknown user or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Correct credentials, disabled account
    #[error("Account is inactive")]
    AccountInactive,

    /// Username already exists
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    /// No token cookie on a protected path
    #[error("Authorization cookie missing")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token: {0}")]
    TokenMalformed(String),

    /// Signature mismatch, wrong algorithm, or any other verification failure
    #[error("Token verification failed: {0}")]
    TokenInvalid(String),

    /// Account store error
    #[error("Account store error: {0}")]
    Store(#[from] SchoolError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidBody(_)
            | AuthError::InvalidHashFormat => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::TokenMalformed(_)
            | AuthError::TokenInvalid(_) => ErrorKind::Unauthorized,
            AuthError::AccountInactive => ErrorKind::Forbidden,
            AuthError::UsernameTaken(_) => ErrorKind::Conflict,
            AuthError::Store(e) => e.kind(),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Fixed message sent to the client
    pub fn client_message(&self) -> String {
        match self {
            AuthError::MissingCredentials => "Invalid or blank username or password".to_string(),
            AuthError::InvalidBody(_) => "invalid request body".to_string(),
            AuthError::InvalidHashFormat => "invalid encoded hash format".to_string(),
            AuthError::InvalidCredentials => "incorrect password".to_string(),
            AuthError::AccountInactive => "user inactive".to_string(),
            AuthError::UsernameTaken(_) => "username already exists".to_string(),
            AuthError::MissingToken => "authorization cookie missing".to_string(),
            AuthError::TokenExpired => "token expired".to_string(),
            AuthError::TokenMalformed(_) => "token not valid".to_string(),
            AuthError::TokenInvalid(_) => "unauthorized".to_string(),
            AuthError::Store(e) => e.client_message(),
            AuthError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.client_message())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Store(e) => {
                tracing::error!(error = %e, "Auth store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidHashFormat => {
                tracing::error!("Stored password hash is malformed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountInactive => {
                tracing::warn!("Login attempt on inactive account");
            }
            AuthError::TokenMalformed(detail) | AuthError::TokenInvalid(detail) => {
                tracing::warn!(detail = %detail, "Token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Malformed(detail) => AuthError::TokenMalformed(detail),
            TokenError::Invalid(detail) => AuthError::TokenInvalid(detail),
            TokenError::Signing(detail) => AuthError::Internal(detail),
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        match err {
            PasswordHashError::InvalidHashFormat => AuthError::InvalidHashFormat,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_distinct_messages() {
        let expired = AuthError::from(TokenError::Expired);
        let malformed = AuthError::from(TokenError::Malformed("bad base64".into()));
        let invalid = AuthError::from(TokenError::Invalid("signature mismatch".into()));

        assert_eq!(expired.client_message(), "token expired");
        assert_eq!(malformed.client_message(), "token not valid");
        assert_eq!(invalid.client_message(), "unauthorized");
        for err in [expired, malformed, invalid] {
            assert_eq!(err.status_code(), 401);
        }
    }

    #[test]
    fn test_invalid_detail_is_not_in_client_message() {
        let err = AuthError::from(TokenError::Invalid("unexpected signing method: none".into()));
        assert!(!err.to_app_error().message().contains("none"));
    }

    #[test]
    fn test_login_error_statuses() {
        assert_eq!(AuthError::MissingCredentials.status_code(), 400);
        assert_eq!(AuthError::InvalidHashFormat.status_code(), 400);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::AccountInactive.status_code(), 403);
        assert_eq!(AuthError::UsernameTaken("x".into()).status_code(), 409);
        assert_eq!(AuthError::from(TokenError::Signing("x".into())).status_code(), 500);
    }

    #[test]
    fn test_hash_error_mapping() {
        assert!(matches!(
            AuthError::from(PasswordHashError::InvalidHashFormat),
            AuthError::InvalidHashFormat
        ));
        assert!(matches!(
            AuthError::from(PasswordHashError::EntropyUnavailable("x".into())),
            AuthError::Internal(_)
        ));
    }
}
