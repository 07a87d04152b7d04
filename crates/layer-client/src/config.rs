//! Configuration for the Layer client

use crate::error::{Error, Result};
use crate::http::BackoffPolicy;
use http::HeaderMap;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the Layer client.
///
/// Everything is optional until the client is built; [`crate::Client::from_config`]
/// reports what is missing.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application (account) id used in every resource path
    pub account_id: Option<String>,

    /// Platform API bearer token
    pub token: Option<SecretString>,

    /// API version sent in the `Accept` header
    pub api_version: Option<String>,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// Timeout for a single attempt
    pub timeout: Option<Duration>,

    /// Retry policy applied to every operation
    pub backoff: Option<BackoffPolicy>,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            token: None,
            api_version: None,
            base_url: None,
            timeout: None,
            backoff: None,
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with credentials and defaults for everything else.
    pub fn new(account_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            token: Some(SecretString::new(token.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Start a builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, without
    /// overriding variables that are already set. Then:
    /// - `LAYER_APP_ID` for the application id
    /// - `LAYER_TOKEN` for the bearer token
    /// - `LAYER_API_VERSION` for the API version
    /// - `LAYER_BASE_URL` for the API base URL
    /// - `LAYER_TIMEOUT` for the per-attempt timeout (in seconds)
    /// - `LAYER_MAX_ATTEMPTS`, `LAYER_MIN_DELAY_MS`, `LAYER_MAX_DELAY_MS` for the backoff policy
    ///
    /// Numeric values that fail to parse are ignored with a warning.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!(error = %e, "failed to load .env file");
        }

        let mut config = Self::default();

        if let Ok(account_id) = env::var("LAYER_APP_ID") {
            config.account_id = Some(account_id);
        }

        if let Ok(token) = env::var("LAYER_TOKEN") {
            config.token = Some(SecretString::new(token.into_boxed_str()));
        }

        if let Ok(api_version) = env::var("LAYER_API_VERSION") {
            config.api_version = Some(api_version);
        }

        if let Ok(base_url) = env::var("LAYER_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Some(secs) = env_number::<u64>("LAYER_TIMEOUT") {
            config.timeout = Some(Duration::from_secs(secs));
        }

        if let Some(max_attempts) = env_number::<u32>("LAYER_MAX_ATTEMPTS") {
            config.backoff_mut().max_attempts = max_attempts;
        }

        if let Some(ms) = env_number::<u64>("LAYER_MIN_DELAY_MS") {
            config.backoff_mut().min_delay = Duration::from_millis(ms);
        }

        if let Some(ms) = env_number::<u64>("LAYER_MAX_DELAY_MS") {
            config.backoff_mut().max_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    ///
    /// Only settings that are present in `other` override.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.account_id.is_some() {
            self.account_id = other.account_id;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.api_version.is_some() {
            self.api_version = other.api_version;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.backoff.is_some() {
            self.backoff = other.backoff;
        }
        for (key, value) in other.default_headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }

        self
    }

    /// Per-attempt timeout, falling back to [`DEFAULT_TIMEOUT`].
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Backoff policy, falling back to [`BackoffPolicy::default`].
    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff.unwrap_or_default()
    }

    fn backoff_mut(&mut self) -> &mut BackoffPolicy {
        self.backoff.get_or_insert_with(BackoffPolicy::default)
    }

    /// API version, falling back to [`crate::DEFAULT_API_VERSION`].
    pub fn api_version(&self) -> &str {
        self.api_version
            .as_deref()
            .unwrap_or(crate::DEFAULT_API_VERSION)
    }

    /// Parse and check the base URL, falling back to [`crate::DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL is empty, does not parse, is
    /// not http(s), or cannot carry path segments.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self
            .base_url
            .as_deref()
            .unwrap_or(crate::DEFAULT_BASE_URL)
            .trim();

        if raw.is_empty() {
            return Err(Error::InvalidUrl("base URL is empty".into()));
        }

        let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("'{}': {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "'{}': scheme must be http or https",
                raw
            )));
        }
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("'{}': cannot be a base", raw)));
        }

        Ok(url)
    }
}

#[cfg(feature = "env")]
fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "ignoring non-numeric value");
            None
        }
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application id.
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.config.account_id = Some(account_id.into());
        self
    }

    /// Set the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(SecretString::new(token.into().into_boxed_str()));
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the API version.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = Some(api_version.into());
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the backoff policy.
    pub fn backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.config.backoff = Some(backoff);
        self
    }

    /// Set the maximum number of attempts, keeping the current delays.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.backoff_mut().max_attempts = max_attempts;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.backoff(), BackoffPolicy::default());
        assert!(config.account_id.is_none());
        assert!(config.token.is_none());
        assert_eq!(config.api_version(), "1.0");
        assert_eq!(config.base_url().unwrap().as_str(), "https://api.layer.com/");
    }

    #[test]
    fn test_config_new() {
        let config = ClientConfig::new("app-1", "tok");
        assert_eq!(config.account_id.as_deref(), Some("app-1"));
        assert_eq!(config.token.unwrap().expose_secret(), "tok");
    }

    #[test]
    fn test_config_builder() {
        let policy = BackoffPolicy::new(5, Duration::from_millis(10), Duration::from_millis(80));
        let config = ClientConfig::builder()
            .account_id("app-1")
            .token("tok")
            .base_url("http://localhost:8080")
            .api_version("2.0")
            .timeout(Duration::from_secs(5))
            .backoff(policy)
            .default_header("x-trace", "abc")
            .unwrap()
            .build();

        assert_eq!(config.api_version(), "2.0");
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8080/");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.backoff(), policy);
        assert_eq!(config.default_headers["x-trace"], "abc");
    }

    #[test]
    fn test_builder_rejects_bad_header() {
        let result = ClientConfig::builder().default_header("bad header", "v");
        assert_matches!(result, Err(Error::InvalidHeaderName(_)));
    }

    #[test]
    fn test_config_merge() {
        let base = ClientConfig::new("app-1", "tok");
        let overlay = ClientConfig::builder()
            .base_url("https://example.com")
            .max_attempts(7)
            .build();

        let merged = base.merge(overlay);
        assert_eq!(merged.account_id.as_deref(), Some("app-1"));
        assert!(merged.token.is_some());
        assert_eq!(merged.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(merged.backoff().max_attempts, 7);
        assert_eq!(merged.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_merge_applies_explicit_defaults() {
        let base = ClientConfig::builder()
            .timeout(Duration::from_secs(5))
            .backoff(BackoffPolicy::none())
            .build();
        let overlay = ClientConfig::builder()
            .timeout(DEFAULT_TIMEOUT)
            .backoff(BackoffPolicy::default())
            .build();

        let merged = base.merge(overlay);
        assert_eq!(merged.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(merged.backoff(), BackoffPolicy::default());
    }

    #[test]
    fn test_merge_keeps_unset_settings() {
        let base = ClientConfig::builder()
            .timeout(Duration::from_secs(5))
            .backoff(BackoffPolicy::none())
            .build();

        let merged = base.merge(ClientConfig::default());
        assert_eq!(merged.timeout(), Duration::from_secs(5));
        assert_eq!(merged.backoff(), BackoffPolicy::none());
    }

    #[test]
    fn test_base_url_validation() {
        let with = |url: &str| ClientConfig::builder().base_url(url).build().base_url();

        assert_matches!(with(""), Err(Error::InvalidUrl(_)));
        assert_matches!(with("   "), Err(Error::InvalidUrl(_)));
        assert_matches!(with("not a url"), Err(Error::InvalidUrl(_)));
        assert_matches!(with("ftp://api.layer.com"), Err(Error::InvalidUrl(_)));
        assert_matches!(with("mailto:ops@layer.com"), Err(Error::InvalidUrl(_)));
        assert!(with("https://api.layer.com/").is_ok());
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("LAYER_APP_ID", Some("app-env")),
                ("LAYER_TOKEN", Some("tok-env")),
                ("LAYER_API_VERSION", Some("1.1")),
                ("LAYER_BASE_URL", Some("http://127.0.0.1:9000")),
                ("LAYER_TIMEOUT", Some("12")),
                ("LAYER_MAX_ATTEMPTS", Some("4")),
                ("LAYER_MIN_DELAY_MS", Some("50")),
                ("LAYER_MAX_DELAY_MS", Some("400")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.account_id.as_deref(), Some("app-env"));
                assert_eq!(config.token.as_ref().unwrap().expose_secret(), "tok-env");
                assert_eq!(config.api_version.as_deref(), Some("1.1"));
                assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:9000"));
                assert_eq!(config.timeout(), Duration::from_secs(12));
                assert_eq!(
                    config.backoff(),
                    BackoffPolicy::new(4, Duration::from_millis(50), Duration::from_millis(400))
                );
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_from_env_ignores_bad_numbers() {
        temp_env::with_vars(
            [
                ("LAYER_APP_ID", None),
                ("LAYER_TOKEN", None),
                ("LAYER_TIMEOUT", Some("soon")),
                ("LAYER_MAX_ATTEMPTS", Some("-1")),
                ("LAYER_MIN_DELAY_MS", None),
                ("LAYER_MAX_DELAY_MS", None),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert!(config.account_id.is_none());
                assert!(config.token.is_none());
                assert!(config.timeout.is_none());
                assert!(config.backoff.is_none());
                assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
            },
        );
    }
}
