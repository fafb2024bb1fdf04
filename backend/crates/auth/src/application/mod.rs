//! Application Layer
//!
//! Use cases and application services.

pub mod authorize;
pub mod config;
pub mod create_accounts;
pub mod sign_in;

// Re-exports
pub use authorize::{AuthDecision, Authorizer};
pub use config::{AuthConfig, ExcludedPaths};
pub use create_accounts::{CreateAccountsUseCase, NewAccountInput};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
