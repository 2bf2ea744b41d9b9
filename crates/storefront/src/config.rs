//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPHERE_SESSION_FILE` - Durable session record (default: .shophere/session.json)
//! - `SHOPHERE_AUTH_LATENCY_MS` - Simulated login/register round trip (default: 1000)
//! - `SHOPHERE_CHECKOUT_LATENCY_MS` - Simulated payment processing (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_SESSION_FILE: &str = ".shophere/session.json";
const DEFAULT_AUTH_LATENCY_MS: u64 = 1000;
const DEFAULT_CHECKOUT_LATENCY_MS: u64 = 2000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Location of the durable session record
    pub session_file: PathBuf,
    /// Delay before login and register resolve
    pub auth_latency: Duration,
    /// Delay before checkout resolves
    pub checkout_latency: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            auth_latency: Duration::from_millis(DEFAULT_AUTH_LATENCY_MS),
            checkout_latency: Duration::from_millis(DEFAULT_CHECKOUT_LATENCY_MS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a latency is not a whole number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let session_file =
            PathBuf::from(get_env_or_default("SHOPHERE_SESSION_FILE", DEFAULT_SESSION_FILE));
        let auth_latency = get_millis("SHOPHERE_AUTH_LATENCY_MS", DEFAULT_AUTH_LATENCY_MS)?;
        let checkout_latency =
            get_millis("SHOPHERE_CHECKOUT_LATENCY_MS", DEFAULT_CHECKOUT_LATENCY_MS)?;

        Ok(Self {
            session_file,
            auth_latency,
            checkout_latency,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Same settings with no simulated delays.
    #[must_use]
    pub fn without_latency(self) -> Self {
        Self {
            auth_latency: Duration::ZERO,
            checkout_latency: Duration::ZERO,
            ..self
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a millisecond duration with a default value.
fn get_millis(key: &str, default: u64) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(Duration::from_millis(default)), |value| {
        parse_millis(key, &value)
    })
}

/// Parse a whole number of milliseconds.
fn parse_millis(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
