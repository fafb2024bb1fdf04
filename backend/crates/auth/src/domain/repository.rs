//! Repository Traits
//!
//! Interface for account persistence. Implementation is in infrastructure layer.

use school::Exec;

use crate::domain::account::{NewAccount, StoredCredential};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Existence check plus what password verification needs
    async fn search_username(&self, username: &str) -> AuthResult<Option<StoredCredential>>;

    /// Full account record by username
    async fn find_login_details(&self, username: &str) -> AuthResult<Option<Exec>>;

    /// Full account record by ID
    async fn find_by_id(&self, id: i64) -> AuthResult<Option<Exec>>;

    /// Insert all accounts or none; a duplicate username fails the batch
    async fn insert_accounts(&self, accounts: Vec<NewAccount>) -> AuthResult<Vec<Exec>>;
}
