//! Feed configuration.
//!
//! Recognized options, by their serialized (camelCase) names:
//! `endpointUrl`, `pollIntervalMs`, `requestTimeoutMs`. The same options can
//! be read from `PRICE_FEED_ENDPOINT_URL`, `PRICE_FEED_POLL_INTERVAL_MS` and
//! `PRICE_FEED_REQUEST_TIMEOUT_MS`.

use crate::error::ConfigError;
#[cfg(feature = "http")]
use crate::http::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const ENV_ENDPOINT_URL: &str = "PRICE_FEED_ENDPOINT_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "PRICE_FEED_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "PRICE_FEED_REQUEST_TIMEOUT_MS";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedConfig {
    pub endpoint_url: String,
    pub poll_interval_ms: u64,
    /// `None` disables the per-request timeout.
    pub request_timeout_ms: Option<u64>,
    #[cfg(feature = "http")]
    #[serde(skip)]
    pub retry: RetryPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint_url: crate::network::DEFAULT_ENDPOINT_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: Some(DEFAULT_REQUEST_TIMEOUT_MS),
            #[cfg(feature = "http")]
            retry: RetryPolicy::None,
        }
    }
}

impl FeedConfig {
    /// Defaults overridden by any `PRICE_FEED_*` variables that are set.
    ///
    /// A timeout of `0` disables the request timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let request_timeout_ms = match env_u64(ENV_REQUEST_TIMEOUT_MS)? {
            Some(0) => None,
            Some(ms) => Some(ms),
            None => defaults.request_timeout_ms,
        };

        let config = Self {
            endpoint_url: env_str(ENV_ENDPOINT_URL).unwrap_or(defaults.endpoint_url),
            poll_interval_ms: env_u64(ENV_POLL_INTERVAL_MS)?.unwrap_or(defaults.poll_interval_ms),
            request_timeout_ms,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config document; missing options take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::InvalidValue {
            name: "config".to_string(),
            value: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.endpoint_url).map_err(|e| {
            ConfigError::InvalidEndpoint {
                url: self.endpoint_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                url: self.endpoint_url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn env_str(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
    env_str(name)
        .map(|raw| {
            raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            })
        })
        .transpose()
}
