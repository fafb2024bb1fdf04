//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use school::Exec;
use serde::{Deserialize, Serialize};

use crate::presentation::middleware::AuthClaims;

pub const STATUS_SUCCESS: &str = "Success";

// ============================================================================
// Login / Logout
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response; the token is also set as the `Bearer` cookie
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub status: &'static str,
}

// ============================================================================
// Exec creation
// ============================================================================

/// One exec in a creation request
#[derive(Debug, Clone, Deserialize)]
pub struct NewExecRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExecsRequest {
    pub execs: Vec<NewExecRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateExecsResponse {
    pub status: &'static str,
    pub count: usize,
    pub data: Vec<Exec>,
}

// ============================================================================
// Current identity
// ============================================================================

/// Claims of the authenticated caller
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AuthClaims> for MeResponse {
    fn from(claims: AuthClaims) -> Self {
        Self {
            id: claims.subject_id,
            username: claims.username,
            role: claims.role,
            expires_at: claims.expires_at,
        }
    }
}
