//! Domain Layer
//!
//! Record types and the record store trait.

pub mod records;
pub mod repository;

// Re-exports
pub use records::{Exec, Record, Student, Teacher};
pub use repository::RecordStore;
