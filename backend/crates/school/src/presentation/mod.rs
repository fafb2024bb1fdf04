//! Presentation Layer
//!
//! HTTP handlers, DTOs, router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::RecordState;
pub use router::{record_routes, school_router};
