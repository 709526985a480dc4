//! Connection settings for the todolists API

use reqwest::Url;
use thiserror::Error;

/// Default server, the public social-network sandbox the client was built for
pub const DEFAULT_BASE_URL: &str = "https://social-network.samuraijs.com/api/1.1";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A value could not be parsed
    #[error("Invalid value for {key}: {message}")]
    Invalid {
        /// Variable or setting name
        key: String,
        /// Why it was rejected
        message: String,
    },
}

/// API client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Value of the `API-KEY` header, if any
    pub api_key: Option<String>,
}

impl ApiConfig {
    /// Create a configuration for `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = validate_base_url("base_url", &base_url.into())?;
        Ok(Self {
            base_url,
            api_key: None,
        })
    }

    /// Load from environment variables
    ///
    /// - `TODOLISTS_BASE_URL` (default [`DEFAULT_BASE_URL`])
    /// - `TODOLISTS_API_KEY` (optional, empty means unset)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the base URL is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("TODOLISTS_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let api_key = std::env::var("TODOLISTS_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            base_url: validate_base_url("TODOLISTS_BASE_URL", &base_url)?,
            api_key,
        })
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

fn validate_base_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::Invalid {
        key: key.to_string(),
        message,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ApiConfig::new("http://localhost:8080/api/").unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_rejects_malformed_url() {
        assert!(matches!(
            ApiConfig::new("not a url"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(ApiConfig::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_with_api_key() {
        let config = ApiConfig::new(DEFAULT_BASE_URL)
            .unwrap()
            .with_api_key("secret");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }
}
