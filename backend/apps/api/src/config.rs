//! Server configuration
//!
//! Read once from the environment at startup. Every value has a default
//! except the signing secret in release builds.

use std::time::Duration;

use auth::{AuthConfig, ExcludedPaths};
use chrono::TimeDelta;
use platform::middleware::CorsConfig;
use platform::rate_limit::RateLimitConfig;
use platform::token::SigningSecret;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8082;
const DEFAULT_DEV_SECRET: &str = "jwtsecret";
const DEFAULT_TOKEN_TTL: &str = "60s";
const DEFAULT_RESET_TOKEN_TTL: &str = "10s";
const DEFAULT_RATE_LIMIT_MAX: u32 = 200;
const DEFAULT_RATE_LIMIT_WINDOW: &str = "1m";
const DEFAULT_FRONTEND_ORIGINS: &str = "https://myorigin.example.com,http://localhost:8080,\
http://localhost:8082,https://k8s-dev.domain.com,https://github.com";

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is not a valid {expected}: {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}

/// Exec account created at startup so the first login is possible
#[derive(Clone)]
pub struct BootstrapExec {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapExec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapExec")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Everything the binary needs to assemble the server
#[derive(Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub debug: bool,
    pub auth: AuthConfig,
    /// Signing secret fell back to the debug-build default
    pub dev_secret: bool,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub bootstrap_exec: Option<BootstrapExec>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => parse_number("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        let debug = match get("DEBUG_FL") {
            Some(value) => parse_bool("DEBUG_FL", &value)?,
            None => false,
        };

        let (secret, dev_secret) = match get("JWT_SECRET") {
            Some(secret) => (secret, false),
            None if cfg!(debug_assertions) => (DEFAULT_DEV_SECRET.to_string(), true),
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let token_ttl_value =
            get("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_TOKEN_TTL.to_string());
        let token_ttl = parse_time_delta("JWT_EXPIRES_IN", &token_ttl_value)?;
        // Token expiry is stored in whole seconds.
        if token_ttl < TimeDelta::seconds(1) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRES_IN",
                expected: "duration of at least 1s",
                value: token_ttl_value,
            });
        }
        let reset_token_ttl = parse_time_delta(
            "RESET_TOKEN_EXP_DURATION",
            &get("RESET_TOKEN_EXP_DURATION").unwrap_or_else(|| DEFAULT_RESET_TOKEN_TTL.to_string()),
        )?;

        let mut auth = AuthConfig::new(SigningSecret::new(secret));
        auth.token_ttl = token_ttl;
        auth.reset_token_ttl = reset_token_ttl;
        if let Some(paths) = get("LOGIN_EXCLUDE_PATHS") {
            auth.excluded_paths = ExcludedPaths::from_csv(&paths);
        }

        let max_requests = match get("RATE_LIMIT_MAX_REQUESTS") {
            Some(value) => parse_number("RATE_LIMIT_MAX_REQUESTS", &value)?,
            None => DEFAULT_RATE_LIMIT_MAX,
        };
        let window = parse_duration(
            "RATE_LIMIT_WINDOW",
            &get("RATE_LIMIT_WINDOW").unwrap_or_else(|| DEFAULT_RATE_LIMIT_WINDOW.to_string()),
        )?;
        if window.is_zero() {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_WINDOW",
                expected: "non-zero duration",
                value: "0".to_string(),
            });
        }

        let cors = CorsConfig::from_csv(
            &get("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string()),
        );

        let bootstrap_exec = match (
            get("BOOTSTRAP_EXEC_USERNAME"),
            get("BOOTSTRAP_EXEC_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapExec { username, password }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Incomplete(
                    "BOOTSTRAP_EXEC_USERNAME",
                    "BOOTSTRAP_EXEC_PASSWORD",
                ));
            }
        };

        Ok(Self {
            port,
            debug,
            auth,
            dev_secret,
            rate_limit: RateLimitConfig::new(max_requests, window),
            cors,
            bootstrap_exec,
        })
    }
}

fn parse_number<N: std::str::FromStr>(key: &'static str, value: &str) -> Result<N, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        expected: "number",
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            expected: "boolean",
            value: value.to_string(),
        }),
    }
}

fn parse_time_delta(key: &'static str, value: &str) -> Result<TimeDelta, ConfigError> {
    let duration = parse_duration(key, value)?;
    TimeDelta::from_std(duration).map_err(|_| ConfigError::Invalid {
        key,
        expected: "duration",
        value: value.to_string(),
    })
}

/// Parse durations like `60s`, `15m`, `1h30m`, `1.5h`, `250ms`
///
/// A bare `0` is accepted; any other number needs a unit.
pub fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::Invalid {
        key,
        expected: "duration",
        value: value.to_string(),
    };

    let input = value.trim();
    if input == "0" {
        return Ok(Duration::ZERO);
    }
    if input.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos = 0f64;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if number_len == 0 {
            return Err(invalid());
        }
        let number: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];

        total_nanos += number * nanos_per_unit;
    }

    if !total_nanos.is_finite() || total_nanos >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.port, 8082);
        assert!(!config.debug);
        assert_eq!(config.auth.token_ttl, TimeDelta::seconds(60));
        assert_eq!(config.auth.reset_token_ttl, TimeDelta::seconds(10));
        assert!(config.auth.excluded_paths.is_excluded("/execs/login"));
        assert_eq!(config.rate_limit.max_requests, 200);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.cors.allowed_origins.len(), 5);
        assert!(config.cors.is_allowed("https://github.com"));
        assert!(config.bootstrap_exec.is_none());
        assert!(!config.dev_secret);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("DEBUG_FL", "true"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN", "15m"),
            ("LOGIN_EXCLUDE_PATHS", " /health , ,/execs/login"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
            ("RATE_LIMIT_WINDOW", "30s"),
            ("FRONTEND_ORIGINS", "http://a.test"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert!(config.debug);
        assert_eq!(config.auth.token_ttl, TimeDelta::minutes(15));
        assert_eq!(
            config.auth.excluded_paths.prefixes(),
            ["/health".to_string(), "/execs/login".to_string()]
        );
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window, Duration::from_secs(30));
        assert_eq!(config.cors.allowed_origins, vec!["http://a.test"]);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("JWT_EXPIRES_IN", "60")]),
            Err(ConfigError::Invalid { key: "JWT_EXPIRES_IN", .. })
        ));
        for ttl in ["0", "500ms"] {
            assert!(matches!(
                config(&[("JWT_SECRET", "s"), ("JWT_EXPIRES_IN", ttl)]),
                Err(ConfigError::Invalid { key: "JWT_EXPIRES_IN", .. })
            ));
        }
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("RATE_LIMIT_WINDOW", "0")]),
            Err(ConfigError::Invalid { key: "RATE_LIMIT_WINDOW", .. })
        ));
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("DEBUG_FL", "yes")]),
            Err(ConfigError::Invalid { key: "DEBUG_FL", .. })
        ));
    }

    #[test]
    fn test_bootstrap_exec_needs_both_values() {
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("BOOTSTRAP_EXEC_USERNAME", "admin")]),
            Err(ConfigError::Incomplete(..))
        ));

        let config = config(&[
            ("JWT_SECRET", "s"),
            ("BOOTSTRAP_EXEC_USERNAME", "admin"),
            ("BOOTSTRAP_EXEC_PASSWORD", "changeme"),
        ])
        .unwrap();
        assert_eq!(config.bootstrap_exec.unwrap().username, "admin");
    }

    #[test]
    fn test_parse_duration() {
        let cases = [
            ("0", Duration::ZERO),
            ("60s", Duration::from_secs(60)),
            ("1m", Duration::from_secs(60)),
            ("1h30m", Duration::from_secs(5400)),
            ("1.5h", Duration::from_secs(5400)),
            ("250ms", Duration::from_millis(250)),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_duration("T", input).unwrap(), expected, "{input}");
        }

        for input in ["", "s", "10", "10x", "-5s", "1..5s"] {
            assert!(parse_duration("T", input).is_err(), "{input}");
        }
    }
}
