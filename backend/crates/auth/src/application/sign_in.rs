//! Sign In Use Case
//!
//! Verifies a username/password pair and issues a signed token.
//!
//! Unknown usernames and wrong passwords produce the same error and both
//! pay for one password hash; only the logs tell them apart. An inactive
//! account is reported only after its password has been verified.

use std::sync::Arc;

use platform::password::{ClearTextPassword, verify_dummy, verify_encoded};
use platform::token::{Claims, TokenService, TokenSubject};

use crate::application::config::AuthConfig;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Signed token for the cookie and response body
    pub token: String,
    /// Claims the token carries
    pub claims: Claims,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    tokens: TokenService,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens: TokenService::new(config.signing_secret.clone()),
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::MissingCredentials)?;

        let Some(credential) = self.repo.search_username(&username).await? else {
            verify_dummy(&password);
            tracing::warn!(username = %username, "Login failed: user not found");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_encoded(&password, &credential.password_hash)? {
            tracing::warn!(username = %username, "Login failed: incorrect password");
            return Err(AuthError::InvalidCredentials);
        }

        if credential.inactive {
            tracing::warn!(username = %username, "Login failed: user inactive");
            return Err(AuthError::AccountInactive);
        }

        let account = self
            .repo
            .find_login_details(&username)
            .await?
            .ok_or_else(|| AuthError::Internal(format!("account {username} disappeared")))?;

        let subject = TokenSubject {
            subject_id: account.id,
            username: account.username,
            role: account.role,
        };
        let token = self.tokens.issue(&subject, self.config.token_ttl)?;
        let claims = self.tokens.verify(&token)?;

        tracing::info!(
            subject_id = subject.subject_id,
            username = %subject.username,
            role = %subject.role,
            "Exec signed in"
        );

        Ok(SignInOutput { token, claims })
    }
}
