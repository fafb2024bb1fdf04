//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the authentication pipeline stage.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AuthClaims, AuthPolicy};
pub use router::auth_router;
