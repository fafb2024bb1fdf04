//! Password Hashing and Verification
//!
//! One-way salted hashing with Argon2id and constant-time verification.
//!
//! ## Stored format
//! `base64(salt) + "." + base64(hash)`, standard padded base64, exactly one
//! delimiter. The KDF parameters are not part of the encoding; they are the
//! fixed constants below. Changing any of them makes every stored hash
//! unverifiable.
//!
//! ## Security Features
//! - Memory-hard hashing prevents GPU/ASIC attacks
//! - 16 byte salt from the OS entropy source per hash
//! - Zeroization of clear text and derived keys
//! - Constant-time comparison of derived hashes

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{constant_time_eq, from_base64, random_bytes, to_base64};

// ============================================================================
// Constants (fixed KDF parameters)
// ============================================================================

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Derived hash length in bytes
pub const HASH_LEN: usize = 32;

/// Argon2id memory cost in KiB (64 MiB)
const ARGON2_M_COST: u32 = 64 * 1024;

/// Argon2id iterations
const ARGON2_T_COST: u32 = 1;

/// Argon2id lanes
const ARGON2_P_COST: u32 = 4;

/// Separator between the salt and hash segments
pub const HASH_DELIMITER: char = '.';

/// Well-formed record that matches no password; verified against when the
/// account does not exist so both paths pay for one KDF run.
const DUMMY_ENCODED: &str =
    "c29tZXNhbHRzb21lc2FsdA==.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

// ============================================================================
// Error Types
// ============================================================================

/// Clear text password rejected before hashing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be blank")]
    Blank,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// OS entropy source could not produce a salt (fatal, not retryable)
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// KDF failed (e.g. invalid parameters or salt length)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored value is not exactly two valid base64 segments
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Exists only for the duration of a request. Debug output is redacted and
/// the type is not `Clone`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Wrap a submitted password; blank input is rejected
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Blank);
        }
        Ok(Self(raw))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with a fresh random salt
    ///
    /// ## Returns
    /// The `{salt, hash}` record; use [`HashedPassword::encode`] to store it.
    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        let salt = random_bytes(SALT_LEN)
            .map_err(|e| PasswordHashError::EntropyUnavailable(e.to_string()))?;
        let hash = derive(self.as_bytes(), &salt)?;

        Ok(HashedPassword {
            salt,
            hash: hash.to_vec(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Stored password record: `{salt, hash}`
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl HashedPassword {
    /// Parse the stored `salt.hash` form
    ///
    /// Fails closed: anything other than exactly two segments that both
    /// decode as base64 is [`PasswordHashError::InvalidHashFormat`].
    pub fn decode(encoded: &str) -> Result<Self, PasswordHashError> {
        let mut parts = encoded.split(HASH_DELIMITER);
        let (Some(salt_b64), Some(hash_b64), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(PasswordHashError::InvalidHashFormat);
        };

        let salt = from_base64(salt_b64).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        let hash = from_base64(hash_b64).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { salt, hash })
    }

    /// Serialize as `base64(salt).base64(hash)`
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}",
            to_base64(&self.salt),
            HASH_DELIMITER,
            to_base64(&self.hash)
        )
    }

    /// Recompute the hash of `password` with this record's salt and compare
    ///
    /// Returns `Ok(true)` only on an equal-length, equal-content match.
    pub fn verify(&self, password: &ClearTextPassword) -> Result<bool, PasswordHashError> {
        let candidate = derive(password.as_bytes(), &self.salt)?;
        Ok(constant_time_eq(candidate.as_slice(), &self.hash))
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("salt", &"[SALT]")
            .field("hash", &"[HASH]")
            .finish()
    }
}

/// Verify `password` against a stored `salt.hash` string
pub fn verify_encoded(password: &ClearTextPassword, encoded: &str) -> Result<bool, PasswordHashError> {
    HashedPassword::decode(encoded)?.verify(password)
}

/// Burn one KDF run against a record that never matches
///
/// Called on the unknown-account path so its latency matches a failed
/// verification.
pub fn verify_dummy(password: &ClearTextPassword) {
    if let Err(e) = verify_encoded(password, DUMMY_ENCODED) {
        tracing::error!(error = %e, "Dummy password verification failed");
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Argon2id with the fixed parameters
fn kdf() -> Result<Argon2<'static>, PasswordHashError> {
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(HASH_LEN))
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn derive(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; HASH_LEN]>, PasswordHashError> {
    let mut out = Zeroizing::new([0u8; HASH_LEN]);
    kdf()?
        .hash_password_into(password, salt, out.as_mut_slice())
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================
