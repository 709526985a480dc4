//! Application configuration
//!
//! Loaded from environment variables (optionally from a `.env` file, see the
//! binary) with builder-style overrides:
//!
//! ```no_run
//! use todolists::AppConfig;
//!
//! # fn main() -> Result<(), todolists_api::ConfigError> {
//! let config = AppConfig::from_env()?.with_log_filter("todolists=debug");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;
use todolists_api::{ApiConfig, ConfigError};

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default bound on draining in-flight requests at shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Remote API settings
    pub api: ApiConfig,
    /// `tracing` filter directive
    pub log_filter: String,
    /// How long shutdown waits for in-flight requests
    pub shutdown_timeout: Duration,
}

impl AppConfig {
    /// Configuration around explicit API settings, defaults elsewhere
    #[must_use]
    pub fn new(api: ApiConfig) -> Self {
        Self {
            api,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Load from environment variables
    ///
    /// - `TODOLISTS_BASE_URL`, `TODOLISTS_API_KEY`: see [`ApiConfig::from_env`]
    /// - `RUST_LOG` (default [`DEFAULT_LOG_FILTER`])
    /// - `TODOLISTS_SHUTDOWN_TIMEOUT_MS` (default 5000)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(ApiConfig::from_env()?);

        if let Some(filter) = non_empty_var("RUST_LOG") {
            config.log_filter = filter;
        }

        if let Some(raw) = non_empty_var("TODOLISTS_SHUTDOWN_TIMEOUT_MS") {
            let millis = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "TODOLISTS_SHUTDOWN_TIMEOUT_MS".to_string(),
                message: e.to_string(),
            })?;
            config.shutdown_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Set the log filter
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Set the shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api = self.api.with_api_key(api_key);
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
