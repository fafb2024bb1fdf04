//! School Records
//!
//! Every record carries an `i64` identifier assigned by the store. String
//! fields left empty in a patch document keep their stored value.

use kernel::impl_patchable;
use kernel::patch::Patchable;
use serde::{Deserialize, Serialize};

/// Stored record with a store-assigned identifier
pub trait Record: Patchable + Clone + Send + Sync + 'static {
    /// Lowercase singular name used in logs and client messages
    const KIND: &'static str;

    fn id(&self) -> i64 {
        self.record_id()
    }

    fn set_id(&mut self, id: i64);

    /// Unique field `self` shares with `other`, if any
    fn duplicate_field(&self, _other: &Self) -> Option<&'static str> {
        None
    }
}

// ============================================================================
// Teacher
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub class: String,
    pub subject: String,
    pub email: String,
}

impl_patchable!(
    Teacher,
    id = id,
    fields = [first_name, last_name, class, subject, email]
);

impl Record for Teacher {
    const KIND: &'static str = "teacher";

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

// ============================================================================
// Student
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub class: String,
}

impl_patchable!(
    Student,
    id = id,
    fields = [first_name, last_name, email, class]
);

impl Record for Student {
    const KIND: &'static str = "student";

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

// ============================================================================
// Exec (staff account)
// ============================================================================

/// Staff account
///
/// `password` holds the encoded `salt.hash` record and is never serialized
/// into responses. Only the profile fields are patchable; role, status and
/// credentials change through their own flows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exec {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub password_changed_at: Option<String>,
    pub user_created_at: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    pub password_token_expires: Option<String>,
    pub inactive_status: bool,
    pub role: String,
}

impl_patchable!(
    Exec,
    id = id,
    fields = [first_name, last_name, email, username]
);

impl Record for Exec {
    const KIND: &'static str = "exec";

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn duplicate_field(&self, other: &Self) -> Option<&'static str> {
        (self.username == other.username).then_some("username")
    }
}
