//! Application Error
//!
//! [`AppError`] is what every crate-level error becomes right before the
//! response is written. It holds only what the client may see; detail that
//! must stay server-side is logged by the crate error before conversion.

use std::borrow::Cow;
use std::fmt;

use super::kind::ErrorKind;

/// Client-safe error: a kind and a fixed message
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Unauthorized, "token expired");
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.to_string(), "[Unauthorized] token expired");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 403, used by the CORS stage
    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// 404, used by the router fallback
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 429, used by the rate-limit stage
    #[inline]
    pub fn too_many_requests(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(AppError::forbidden("Not allowed by CORS").status_code(), 403);
        assert_eq!(AppError::not_found("route not found").status_code(), 404);
        assert_eq!(
            AppError::too_many_requests("Too many requests").kind(),
            ErrorKind::TooManyRequests
        );
    }

    #[test]
    fn test_owned_message() {
        let err = AppError::new(ErrorKind::BadRequest, format!("invalid {} id", "teacher"));
        assert_eq!(err.message(), "invalid teacher id");
    }
}
