//! School Error Types
//!
//! Record-level error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// School-specific result type alias
pub type SchoolResult<T> = Result<T, SchoolError>;

#[derive(Debug, Error)]
pub enum SchoolError {
    /// Identifier missing or not positive
    #[error("Invalid {kind} id: {id}")]
    InvalidId { kind: &'static str, id: i64 },

    /// No stored record with this identifier
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// Body is not JSON or does not fit the record type
    #[error("Unreadable request body: {0}")]
    InvalidBody(String),

    /// Another record already holds a unique field value
    #[error("Duplicate {kind} {field}")]
    Duplicate {
        kind: &'static str,
        field: &'static str,
    },

    /// Path segment is not a record identifier
    #[error("Unreadable path parameter: {0}")]
    InvalidPath(String),

    /// Record store failure
    #[error("Record store error: {0}")]
    Store(String),
}

impl SchoolError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchoolError::InvalidId { .. }
            | SchoolError::InvalidBody(_)
            | SchoolError::InvalidPath(_) => ErrorKind::BadRequest,
            SchoolError::NotFound { .. } => ErrorKind::NotFound,
            SchoolError::Duplicate { .. } => ErrorKind::Conflict,
            SchoolError::Store(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Fixed message sent to the client
    pub fn client_message(&self) -> String {
        match self {
            SchoolError::InvalidId { kind, .. } => format!("invalid {kind} id"),
            SchoolError::InvalidBody(_) => "invalid request body".to_string(),
            SchoolError::InvalidPath(_) => "invalid path parameter".to_string(),
            SchoolError::NotFound { .. } => "record not found".to_string(),
            SchoolError::Duplicate { field, .. } => format!("{field} already exists"),
            SchoolError::Store(_) => "Internal server error".to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.client_message())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SchoolError::Store(msg) => {
                tracing::error!(message = %msg, "Record store error");
            }
            _ => {
                tracing::debug!(error = %self, "School error");
            }
        }
    }
}

impl From<JsonRejection> for SchoolError {
    fn from(rejection: JsonRejection) -> Self {
        SchoolError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for SchoolError {
    fn from(rejection: PathRejection) -> Self {
        SchoolError::InvalidPath(rejection.body_text())
    }
}

impl IntoResponse for SchoolError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
