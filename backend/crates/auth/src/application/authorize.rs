//! Request Authorization
//!
//! Decides, per request path and presented token, whether the request is
//! public, authenticated, or refused.

use std::sync::Arc;

use platform::token::{Claims, TokenService};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Outcome of a successful authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// Path is excluded; no identity is attached
    Public,
    /// Token verified; these claims are the caller's identity
    Authenticated(Claims),
}

#[derive(Debug, Clone)]
pub struct Authorizer {
    config: Arc<AuthConfig>,
    tokens: TokenService,
}

impl Authorizer {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            tokens: TokenService::new(config.signing_secret.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authorize a request for `path` carrying `token` (the cookie value)
    pub fn authorize(&self, path: &str, token: Option<&str>) -> AuthResult<AuthDecision> {
        if let Some(prefix) = self.config.excluded_paths.matching(path) {
            tracing::debug!(path = %path, prefix = %prefix, "Public path");
            return Ok(AuthDecision::Public);
        }

        let token = token.ok_or(AuthError::MissingToken)?;
        let claims = self.tokens.verify(token)?;

        Ok(AuthDecision::Authenticated(claims))
    }
}
