//! Runtime configuration.
//!
//! Defaults are overridden by `STOCKVIEW_*` environment variables, and the
//! CLI applies its flags on top of that.

use std::time::Duration;

use url::Url;

use crate::{ConfigError, RetryPolicy, SelectionScope};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

pub const ENV_BACKEND_URL: &str = "STOCKVIEW_BACKEND_URL";
pub const ENV_TIMEOUT_MS: &str = "STOCKVIEW_TIMEOUT_MS";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "STOCKVIEW_SEARCH_DEBOUNCE_MS";
pub const ENV_MAX_RETRIES: &str = "STOCKVIEW_MAX_RETRIES";
pub const ENV_SELECTION_SCOPE: &str = "STOCKVIEW_SELECTION_SCOPE";

#[derive(Debug, Clone, PartialEq)]
pub struct StockviewConfig {
    backend_url: String,
    pub timeout_ms: u64,
    pub search_debounce: Duration,
    pub retry: RetryPolicy,
    pub selection_scope: SelectionScope,
}

impl Default for StockviewConfig {
    fn default() -> Self {
        Self {
            backend_url: String::from(DEFAULT_BACKEND_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            retry: RetryPolicy::default(),
            selection_scope: SelectionScope::default(),
        }
    }
}

impl StockviewConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BACKEND_URL) {
            config = config.with_backend_url(&value)?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = parse_number("timeout_ms", &value)?;
        }
        if let Some(value) = lookup(ENV_SEARCH_DEBOUNCE_MS) {
            config.search_debounce =
                Duration::from_millis(parse_number("search_debounce_ms", &value)?);
        }
        if let Some(value) = lookup(ENV_MAX_RETRIES) {
            let max_retries = parse_number("max_retries", &value)?;
            config.retry.max_retries =
                u32::try_from(max_retries).map_err(|_| ConfigError::InvalidNumber {
                    name: "max_retries",
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(ENV_SELECTION_SCOPE) {
            config.selection_scope = value.parse()?;
        }

        Ok(config)
    }

    /// Replace the backend base URL. Only http(s) URLs are accepted; a
    /// trailing slash is dropped so endpoint paths can be appended.
    pub fn with_backend_url(mut self, value: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(value.trim()).map_err(|error| ConfigError::InvalidBackendUrl {
            value: value.to_owned(),
            reason: error.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                value: value.to_owned(),
            });
        }

        self.backend_url = parsed.as_str().trim_end_matches('/').to_owned();
        Ok(self)
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_owned(),
        })
}
