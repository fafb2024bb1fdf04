//! Shared Kernel
//!
//! Vocabulary every school-records crate agrees on:
//! - [`error`]: failure classes and the client-safe error rendered as
//!   problem JSON
//! - [`patch`]: the partial-update merge engine used by every record type
//!
//! Nothing here knows about tokens, passwords or storage.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod patch;
