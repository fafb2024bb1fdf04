//! Create Accounts Use Case
//!
//! Bulk exec creation. Batches are serialized behind one lock so that a
//! batch's identifiers are contiguous and in input order.

use std::sync::Arc;

use platform::password::ClearTextPassword;
use school::Exec;
use tokio::sync::Mutex;

use crate::domain::account::NewAccount;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// One account as submitted
pub struct NewAccountInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: String,
}

pub struct CreateAccountsUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    lock: Arc<Mutex<()>>,
}

impl<R> CreateAccountsUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_lock(repo, Arc::new(Mutex::new(())))
    }

    /// Share `lock` with every other creator of the same store
    pub fn with_lock(repo: Arc<R>, lock: Arc<Mutex<()>>) -> Self {
        Self { repo, lock }
    }

    pub async fn execute(&self, inputs: Vec<NewAccountInput>) -> AuthResult<Vec<Exec>> {
        let _guard = self.lock.lock().await;

        let mut accounts = Vec::with_capacity(inputs.len());
        for input in inputs {
            let username = input.username.trim().to_string();
            if username.is_empty() {
                return Err(AuthError::MissingCredentials);
            }
            let password = ClearTextPassword::new(input.password)
                .map_err(|_| AuthError::MissingCredentials)?;

            accounts.push(NewAccount {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                username,
                password: password.hash()?,
                role: input.role,
            });
        }

        let created = self.repo.insert_accounts(accounts).await?;

        tracing::info!(count = created.len(), "Exec accounts created");

        Ok(created)
    }
}
