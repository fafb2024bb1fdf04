//! Error Kind
//!
//! The closed set of failure classes a gateway response can carry.

/// Failure class of a request
///
/// Each variant maps onto exactly one HTTP status code, so a handler never
/// picks a status by hand.
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::TooManyRequests.status_code(), 429);
/// assert_eq!(ErrorKind::Forbidden.title(), "Forbidden");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Blank credentials, unreadable body, non-positive record id
    BadRequest,
    /// No token, bad token, wrong password
    Unauthorized,
    /// Inactive account, refused CORS origin
    Forbidden,
    NotFound,
    /// Duplicate username
    Conflict,
    TooManyRequests,
    InternalServerError,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
        }
    }

    /// Reason phrase, used as the problem `title`
    #[inline]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::Conflict => "Conflict",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_statuses() {
        let cases = [
            (ErrorKind::BadRequest, 400),
            (ErrorKind::Unauthorized, 401),
            (ErrorKind::Forbidden, 403),
            (ErrorKind::NotFound, 404),
            (ErrorKind::Conflict, 409),
            (ErrorKind::TooManyRequests, 429),
            (ErrorKind::InternalServerError, 500),
        ];
        for (kind, status) in cases {
            assert_eq!(kind.status_code(), status, "{kind}");
        }
    }

    #[test]
    fn test_display_is_title() {
        assert_eq!(ErrorKind::TooManyRequests.to_string(), "Too Many Requests");
    }
}
