//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 3000)
//! - `CATALOG_API_BASE_URL` - Upstream product API (default: <https://fakestoreapi.com>)
//! - `CATALOG_UPSTREAM_TIMEOUT_SECS` - Request timeout for the upstream client (default: none)
//! - `CATALOG_PRERENDER` - Generate pages at startup (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Upstream API used when `CATALOG_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upstream product API configuration
    pub upstream: UpstreamConfig,
    /// Generate the listing and every detail page at startup
    pub prerender: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Upstream product API configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL; `/products` is appended to it.
    pub base_url: Url,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl UpstreamConfig {
    /// Configuration pointing at `base_url` with no timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("CATALOG_API_BASE_URL", base_url)?,
            timeout: None,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("CATALOG_API_BASE_URL", DEFAULT_API_BASE_URL);
        let timeout = get_optional_env("CATALOG_UPSTREAM_TIMEOUT_SECS")
            .map(|v| parse_env::<u64>("CATALOG_UPSTREAM_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            base_url: parse_base_url("CATALOG_API_BASE_URL", &base_url)?,
            timeout,
        })
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("CATALOG_HOST", &get_env_or_default("CATALOG_HOST", "127.0.0.1"))?;
        let port = parse_env("CATALOG_PORT", &get_env_or_default("CATALOG_PORT", "3000"))?;
        let prerender = parse_env(
            "CATALOG_PRERENDER",
            &get_env_or_default("CATALOG_PRERENDER", "true"),
        )?;

        Ok(Self {
            host,
            port,
            upstream: UpstreamConfig::from_env()?,
            prerender,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env(
                "SENTRY_SAMPLE_RATE",
                &get_env_or_default("SENTRY_SAMPLE_RATE", "1.0"),
            )?,
            sentry_traces_sample_rate: parse_env(
                "SENTRY_TRACES_SAMPLE_RATE",
                &get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
            )?,
        })
    }

    /// Defaults for everything but the upstream, with pre-rendering off.
    #[must_use]
    pub fn with_upstream(upstream: UpstreamConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            upstream,
            prerender: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a value, naming the variable it came from on failure.
fn parse_env<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse and check an upstream base URL. A trailing slash is dropped so that
/// paths can be appended with `/`.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim().trim_end_matches('/'))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute URL with a host".to_string(),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_parse_base_url_default() {
        let url = parse_base_url("TEST_VAR", DEFAULT_API_BASE_URL).unwrap();
        assert_eq!(url.host_str(), Some("fakestoreapi.com"));
    }

    #[test]
    fn test_parse_base_url_keeps_path_prefix() {
        let url = parse_base_url("TEST_VAR", "http://127.0.0.1:8080/api/").unwrap();
        assert_eq!(url.path(), "/api");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_parse_base_url_rejects_scheme() {
        let err = parse_base_url("TEST_VAR", "ftp://fakestoreapi.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[rstest]
    #[case::not_a_url("not a url")]
    #[case::no_host("mailto:someone@example.com")]
    #[case::relative("/products")]
    #[case::empty("")]
    fn test_parse_base_url_rejects_garbage(#[case] value: &str) {
        let err = parse_base_url("CATALOG_API_BASE_URL", value).unwrap_err();
        assert!(err.to_string().contains("CATALOG_API_BASE_URL"));
    }

    #[test]
    fn test_parse_env_names_variable() {
        let err = parse_env::<u16>("CATALOG_PORT", "seventy").unwrap_err();
        assert!(err.to_string().starts_with("Invalid environment variable CATALOG_PORT"));

        assert_eq!(parse_env::<u16>("CATALOG_PORT", " 3000 ").unwrap(), 3000);
        assert!(parse_env::<bool>("CATALOG_PRERENDER", "false").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = CatalogConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            upstream: UpstreamConfig::new(DEFAULT_API_BASE_URL).unwrap(),
            prerender: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
