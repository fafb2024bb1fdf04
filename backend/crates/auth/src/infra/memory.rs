//! In-Memory Account Repository
//!
//! Accounts are the exec records of the shared school store, so a record
//! patched through `PATCH /execs` is what the next login sees.

use std::collections::HashSet;

use chrono::Utc;
use school::{Exec, MemoryStore, RecordStore};

use crate::domain::account::{NewAccount, StoredCredential};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

impl AccountRepository for MemoryStore<Exec> {
    async fn search_username(&self, username: &str) -> AuthResult<Option<StoredCredential>> {
        Ok(self
            .find_first(|exec| exec.username == username)?
            .as_ref()
            .map(StoredCredential::from))
    }

    async fn find_login_details(&self, username: &str) -> AuthResult<Option<Exec>> {
        Ok(self.find_first(|exec| exec.username == username)?)
    }

    async fn find_by_id(&self, id: i64) -> AuthResult<Option<Exec>> {
        Ok(RecordStore::find_by_id(self, id).await?)
    }

    async fn insert_accounts(&self, accounts: Vec<NewAccount>) -> AuthResult<Vec<Exec>> {
        let created_at = Utc::now().to_rfc3339();
        let execs: Vec<Exec> = accounts
            .into_iter()
            .map(|account| account.into_exec(created_at.clone()))
            .collect();

        let mut seen = HashSet::new();
        for exec in &execs {
            if !seen.insert(exec.username.as_str()) {
                return Err(AuthError::UsernameTaken(exec.username.clone()));
            }
        }

        self.insert_all_checked(execs, |stored, exec| {
            if stored.values().any(|existing| existing.username == exec.username) {
                Err(AuthError::UsernameTaken(exec.username.clone()))
            } else {
                Ok(())
            }
        })
    }
}
