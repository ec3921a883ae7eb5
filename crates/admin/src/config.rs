//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JOBBOARD_API_URL` - Base URL of the job-board backend API
//!
//! ## Optional
//! - `JOBBOARD_API_TOKEN` - Bearer token for the backend (high entropy, not a placeholder)
//! - `JOBBOARD_API_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `JOBBOARD_LOG_JSON` - Emit JSON logs when set to `1`/`true`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const MIN_TOKEN_LENGTH: usize = 16;

/// Substrings that mark a token as copied from a template (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
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

/// Backend connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every route is resolved against.
    pub base_url: Url,
    /// Bearer token, if the backend requires one.
    pub token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Admin tooling configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub api: ApiConfig,
    /// Emit logs as JSON lines instead of text.
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the API token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`AdminConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("JOBBOARD_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("JOBBOARD_API_URL".to_string()))?;
        let base_url = parse_base_url(&raw_url)?;

        let token = get("JOBBOARD_API_TOKEN")
            .map(|token| {
                validate_secret_strength(&token, "JOBBOARD_API_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        let timeout_secs = match get("JOBBOARD_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("JOBBOARD_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "JOBBOARD_API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let log_json = get("JOBBOARD_LOG_JSON")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self {
            api: ApiConfig {
                base_url,
                token,
                timeout: Duration::from_secs(timeout_secs),
            },
            log_json,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns a reference to the backend settings.
    #[must_use]
    pub const fn api(&self) -> &ApiConfig {
        &self.api
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the API base URL; only http(s) URLs that can carry a path are allowed.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("JOBBOARD_API_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // token length never exceeds f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject tokens that look copied from a template or are too predictable.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| ConfigError::InsecureSecret(var_name.to_string(), reason);
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(insecure(format!(
            "appears to be a placeholder (contains '{pattern}')"
        )));
    }

    if secret.len() < MIN_TOKEN_LENGTH {
        return Err(insecure(format!(
            "must be at least {MIN_TOKEN_LENGTH} characters (got {})",
            secret.len()
        )));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(insecure(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn token_value(config: &AdminConfig) -> Option<&str> {
        config.api.token.as_ref().map(ExposeSecret::expose_secret)
    }

    const TOKEN: &str = "tk_9fQ2xL7pW4rZ8mN3";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config =
            AdminConfig::from_lookup(lookup(&[("JOBBOARD_API_URL", "https://api.jobs.test/v1/")]))
                .unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.jobs.test/v1/");
        assert_eq!(config.api.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.api.token.is_none());
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_url() {
        let err = AdminConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "JOBBOARD_API_URL"));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = AdminConfig::from_lookup(lookup(&[("JOBBOARD_API_URL", "ftp://files.test")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_timeout_and_flags() {
        let config = AdminConfig::from_lookup(lookup(&[
            ("JOBBOARD_API_URL", "http://localhost:8080"),
            ("JOBBOARD_API_TIMEOUT_SECS", "5"),
            ("JOBBOARD_LOG_JSON", "true"),
            ("SENTRY_DSN", "https://key@sentry.test/1"),
        ]))
        .unwrap();
        assert_eq!(config.api.timeout, Duration::from_secs(5));
        assert!(config.log_json);
        assert_eq!(config.sentry_dsn.as_deref(), Some("https://key@sentry.test/1"));

        let err = AdminConfig::from_lookup(lookup(&[
            ("JOBBOARD_API_URL", "http://localhost:8080"),
            ("JOBBOARD_API_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_token_validated_and_redacted() {
        let config = AdminConfig::from_lookup(lookup(&[
            ("JOBBOARD_API_URL", "https://api.jobs.test"),
            ("JOBBOARD_API_TOKEN", TOKEN),
        ]))
        .unwrap();
        assert_eq!(token_value(&config), Some(TOKEN));

        let debug_output = format!("{:?}", config.api);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(TOKEN));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = AdminConfig::from_lookup(lookup(&[
            ("JOBBOARD_API_URL", "https://api.jobs.test"),
            ("JOBBOARD_API_TOKEN", "your-api-token-goes-here"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_low_entropy_token_rejected() {
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaa", "T").is_err());
        assert!(validate_secret_strength("short", "T").is_err());
        assert!(validate_secret_strength(TOKEN, "T").is_ok());
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy(TOKEN) > MIN_ENTROPY_BITS_PER_CHAR);
    }
}
