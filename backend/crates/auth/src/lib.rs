//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Account lookup types and repository trait
//! - `application/` - Login, account creation, request authorization
//! - `infra/` - Account repository over the in-memory exec store
//! - `presentation/` - HTTP handlers, DTOs, router, pipeline policy
//!
//! ## Features
//! - Exec (staff) login with username + password, token issued as a cookie
//! - Bulk exec creation with Argon2id password hashing
//! - Authentication stage of the request pipeline with path exclusions
//! - Verified claims available to handlers as `Extension<AuthClaims>`
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, compared in constant time
//! - Unknown usernames and wrong passwords get the same response
//! - Tokens are HS256 only; expiry enforced on every request
//! - No server-side revocation: logout clears the cookie, tokens live
//!   until their `exp`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, ExcludedPaths};
pub use error::{AuthError, AuthResult};
pub use presentation::middleware::{AuthClaims, AuthPolicy};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
