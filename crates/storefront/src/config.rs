//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PARTSHUB_API_BASE_URL` - Base URL of the Partshub REST backend
//! - `PARTSHUB_API_TOKEN` - Bearer token for backend requests
//!
//! ## Optional
//! - `PARTSHUB_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `PARTSHUB_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL (default: 300)

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Base URL of the Partshub REST backend
    pub api_base_url: Url,
    /// Bearer token sent with every backend request
    pub api_token: SecretString,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// TTL for cached catalog responses
    pub catalog_cache_ttl: Duration,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the API token fails placeholder validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_url("PARTSHUB_API_BASE_URL", &get_required_env("PARTSHUB_API_BASE_URL")?)?;
        let api_token = get_validated_secret("PARTSHUB_API_TOKEN")?;
        let request_timeout = Duration::from_secs(parse_u64(
            "PARTSHUB_REQUEST_TIMEOUT_SECS",
            &get_env_or_default("PARTSHUB_REQUEST_TIMEOUT_SECS", "10"),
        )?);
        let catalog_cache_ttl = Duration::from_secs(parse_u64(
            "PARTSHUB_CATALOG_CACHE_TTL_SECS",
            &get_env_or_default("PARTSHUB_CATALOG_CACHE_TTL_SECS", "300"),
        )?);

        Ok(Self {
            api_base_url,
            api_token,
            request_timeout,
            catalog_cache_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a secret is not an obvious placeholder.
///
/// The backend token is an issued credential; an entropy check would reject
/// legitimate short-alphabet tokens, so only the blocklist is applied.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Expose the configured token for use in a request header.
pub(crate) fn bearer_header_value(config: &StorefrontConfig) -> String {
    format!("Bearer {}", config.api_token.expose_secret())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            api_base_url: Url::parse("https://api.partshub.test/v1/").unwrap(),
            api_token: SecretString::from("tok_8fj29dkq0a"),
            request_timeout: Duration::from_secs(10),
            catalog_cache_ttl: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-token-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("tok_8fj29dkq0a", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_parse_url_invalid() {
        assert!(matches!(
            parse_url("TEST_URL", "not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_parse_u64_invalid() {
        assert!(parse_u64("TEST_NUM", "ten").is_err());
        assert_eq!(parse_u64("TEST_NUM", "10").unwrap(), 10);
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug_output = format!("{:?}", test_config());
        assert!(debug_output.contains("api.partshub.test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok_8fj29dkq0a"));
    }

    #[test]
    fn test_bearer_header_value() {
        assert_eq!(bearer_header_value(&test_config()), "Bearer tok_8fj29dkq0a");
    }
}
