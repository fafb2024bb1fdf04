//! Token Service
//!
//! Issues and verifies compact HS256 tokens (`header.payload.signature`,
//! URL-safe base64 without padding) carrying the identity claims of a
//! signed-in account.
//!
//! ## Wire claims
//! `uid` (string-encoded numeric subject id), `user`, `role`, `exp` (unix
//! seconds).
//!
//! ## Verification order
//! `Received -> Parsed -> SignatureChecked -> ExpiryChecked`. Each step has
//! its own failure kind:
//! - not three segments, bad base64, bad JSON: [`TokenError::Malformed`]
//! - any algorithm other than HS256, or a signature mismatch:
//!   [`TokenError::Invalid`]
//! - authentic but past `exp`: [`TokenError::Expired`]

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{from_base64_url, to_base64_url};

type HmacSha256 = Hmac<Sha256>;

/// The only accepted signing algorithm
pub const TOKEN_ALGORITHM: &str = "HS256";

const TOKEN_TYPE: &str = "JWT";

// ============================================================================
// Error Types
// ============================================================================

/// Token issue/verification errors
///
/// The `String` payloads are log-only detail; callers map each variant to a
/// fixed client message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

// ============================================================================
// Signing Secret
// ============================================================================

/// Shared HMAC secret; zeroized on drop, never printed
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into().into_bytes())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Claims
// ============================================================================

/// Who a token is issued to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub subject_id: i64,
    pub username: String,
    pub role: String,
}

/// Verified identity claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub subject_id: i64,
    pub username: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            subject_id: self.subject_id,
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

#[derive(Serialize, Deserialize)]
struct WireClaims {
    uid: String,
    user: String,
    role: String,
    exp: i64,
}

// ============================================================================
// Token Service
// ============================================================================

/// Stateless issuer/verifier bound to one secret
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: SigningSecret,
}

impl TokenService {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    /// Sign a token for `subject` that expires `ttl` from now
    ///
    /// A negative `ttl` yields a token that is already expired.
    pub fn issue(&self, subject: &TokenSubject, ttl: TimeDelta) -> Result<String, TokenError> {
        let exp = (Utc::now() + ttl).timestamp();

        let header = Header {
            alg: TOKEN_ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        };
        let claims = WireClaims {
            uid: subject.subject_id.to_string(),
            user: subject.username.clone(),
            role: subject.role.clone(),
            exp,
        };

        let header_json =
            serde_json::to_vec(&header).map_err(|e| TokenError::Signing(e.to_string()))?;
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| TokenError::Signing(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            to_base64_url(&header_json),
            to_base64_url(&claims_json)
        );
        let signature = self.sign(signing_input.as_bytes())?;

        Ok(format!("{}.{}", signing_input, to_base64_url(&signature)))
    }

    /// Verify `token` and return its claims unchanged
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        // Parsed
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed("expected three segments".to_string()));
        };

        let header: Header = decode_segment(header_b64)?;
        let wire: WireClaims = decode_segment(claims_b64)?;
        let signature = from_base64_url(signature_b64)
            .map_err(|e| TokenError::Malformed(format!("signature: {e}")))?;
        let subject_id = wire
            .uid
            .parse::<i64>()
            .map_err(|e| TokenError::Malformed(format!("uid: {e}")))?;
        let expires_at = DateTime::<Utc>::from_timestamp(wire.exp, 0)
            .ok_or_else(|| TokenError::Malformed("exp out of range".to_string()))?;

        // SignatureChecked
        if header.alg != TOKEN_ALGORITHM {
            return Err(TokenError::Invalid(format!(
                "unexpected signing method: {}",
                header.alg
            )));
        }

        let signing_input_len = header_b64.len() + 1 + claims_b64.len();
        let mut mac = self.mac()?;
        mac.update(&token.as_bytes()[..signing_input_len]);
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::Invalid("signature mismatch".to_string()))?;

        // ExpiryChecked
        if Utc::now() >= expires_at {
            return Err(TokenError::Expired);
        }

        Ok(Claims {
            subject_id,
            username: wire.user,
            role: wire.role,
            expires_at,
        })
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.mac()?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = from_base64_url(segment).map_err(|e| TokenError::Malformed(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Malformed(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
