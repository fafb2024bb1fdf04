//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared read-only.

use chrono::TimeDelta;
use platform::cookie::CookieConfig;
use platform::token::SigningSecret;

/// Default public path prefixes
pub const DEFAULT_EXCLUDED_PATHS: &str =
    "/docs,/openapi,/schemas,/execs/login,/execs/forgotpassword";

/// Path prefixes that skip authentication, checked in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedPaths {
    prefixes: Vec<String>,
}

impl ExcludedPaths {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Parse a comma separated list; entries are trimmed and blanks dropped
    pub fn from_csv(csv: &str) -> Self {
        Self::new(
            csv.split(',')
                .map(str::trim)
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// First configured prefix that `path` starts with
    pub fn matching(&self, path: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| path.starts_with(prefix))
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.matching(path).is_some()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for ExcludedPaths {
    fn default() -> Self {
        Self::from_csv(DEFAULT_EXCLUDED_PATHS)
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token cookie (`Bearer`, HttpOnly, Path=/, 24h)
    pub cookie: CookieConfig,
    /// HMAC secret for tokens
    pub signing_secret: SigningSecret,
    /// Lifetime written into each token's `exp`
    pub token_ttl: TimeDelta,
    /// Public path prefixes
    pub excluded_paths: ExcludedPaths,
    /// Lifetime of password reset tokens
    pub reset_token_ttl: TimeDelta,
}

impl AuthConfig {
    pub fn new(signing_secret: SigningSecret) -> Self {
        Self {
            cookie: CookieConfig::default(),
            signing_secret,
            token_ttl: TimeDelta::seconds(60),
            excluded_paths: ExcludedPaths::default(),
            reset_token_ttl: TimeDelta::seconds(10),
        }
    }

    /// Create config for development (fixed secret, insecure cookie)
    pub fn development() -> Self {
        Self::new(SigningSecret::new("jwtsecret"))
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie.name
    }
}
