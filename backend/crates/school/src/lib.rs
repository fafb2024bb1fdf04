//! School Records Module
//!
//! Clean Architecture structure:
//! - `domain/` - Record types and the record store trait
//! - `application/` - Create, lookup and partial-update use cases
//! - `infra/` - In-memory record store
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Teachers, students and execs all go through the same generic handlers;
//! each record type declares its mergeable fields with
//! [`kernel::impl_patchable!`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use domain::records::{Exec, Record, Student, Teacher};
pub use domain::repository::RecordStore;
pub use error::{SchoolError, SchoolResult};
pub use infra::memory::MemoryStore;
pub use presentation::router::school_router;
