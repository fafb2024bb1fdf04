//! Account Types
//!
//! Accounts are exec records; these are the views of them that login and
//! account creation work with.

use platform::password::HashedPassword;
use school::Exec;

/// What a username lookup yields for password verification
#[derive(Debug, Clone)]
pub struct StoredCredential {
    /// Encoded `salt.hash` record
    pub password_hash: String,
    pub inactive: bool,
}

impl From<&Exec> for StoredCredential {
    fn from(exec: &Exec) -> Self {
        Self {
            password_hash: exec.password.clone(),
            inactive: exec.inactive_status,
        }
    }
}

/// Account about to be inserted; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: HashedPassword,
    pub role: String,
}

impl NewAccount {
    /// Exec record for this account, created now and active
    pub fn into_exec(self, created_at: String) -> Exec {
        Exec {
            id: 0,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            username: self.username,
            password: self.password.encode(),
            password_changed_at: None,
            user_created_at: Some(created_at),
            password_reset_token: None,
            password_token_expires: None,
            inactive_status: false,
            role: self.role,
        }
    }
}
