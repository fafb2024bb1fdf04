//! Domain Layer
//!
//! Account lookup types and the repository trait.

pub mod account;
pub mod repository;

// Re-exports
pub use account::{NewAccount, StoredCredential};
pub use repository::AccountRepository;
