//! High-level client: `PriceFeedClient` with nested sub-client accessors.

use crate::config::FeedConfig;
use crate::domain::price_history::client::PriceHistoryClient;
use crate::error::FeedError;
use crate::http::{FeedHttp, RetryPolicy};
use std::time::Duration;

pub use crate::domain::price_history::client::PriceHistoryClient as PriceHistorySubClient;

/// The primary entry point for talking to the price feed.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PriceFeedClient {
    pub(crate) http: FeedHttp,
    pub(crate) range: String,
    pub(crate) retry: RetryPolicy,
}

impl PriceFeedClient {
    pub fn builder() -> PriceFeedClientBuilder {
        PriceFeedClientBuilder::default()
    }

    /// Build a client from a validated config.
    pub fn from_config(config: &FeedConfig) -> Result<Self, FeedError> {
        Self::builder()
            .endpoint_url(&config.endpoint_url)
            .request_timeout(config.request_timeout())
            .retry(config.retry.clone())
            .build()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn price_history(&self) -> PriceHistoryClient<'_> {
        PriceHistoryClient { client: self }
    }

    pub fn endpoint_url(&self) -> &str {
        self.http.endpoint_url()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct PriceFeedClientBuilder {
    endpoint_url: String,
    request_timeout: Option<Duration>,
    retry: RetryPolicy,
}

impl Default for PriceFeedClientBuilder {
    fn default() -> Self {
        let config = FeedConfig::default();
        Self {
            endpoint_url: config.endpoint_url.clone(),
            request_timeout: config.request_timeout(),
            retry: config.retry,
        }
    }
}

impl PriceFeedClientBuilder {
    pub fn endpoint_url(mut self, url: &str) -> Self {
        self.endpoint_url = url.to_string();
        self
    }

    /// `None` disables the per-request timeout.
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<PriceFeedClient, FeedError> {
        FeedConfig {
            endpoint_url: self.endpoint_url.clone(),
            ..FeedConfig::default()
        }
        .validate()?;

        Ok(PriceFeedClient {
            http: FeedHttp::new(&self.endpoint_url, self.request_timeout)?,
            range: crate::network::DEFAULT_RANGE.to_string(),
            retry: self.retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_builder_defaults() {
        let client = PriceFeedClient::builder().build().unwrap();
        assert_eq!(client.endpoint_url(), crate::network::DEFAULT_ENDPOINT_URL);
        assert_eq!(client.range, "1D");
        assert_eq!(client.retry, RetryPolicy::None);
    }

    #[test]
    fn test_builder_rejects_invalid_endpoint() {
        let err = PriceFeedClient::builder()
            .endpoint_url("nope")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            FeedError::Config(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = FeedConfig {
            endpoint_url: "http://127.0.0.1:9/prices".to_string(),
            retry: RetryPolicy::Idempotent,
            ..FeedConfig::default()
        };
        let client = PriceFeedClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint_url(), "http://127.0.0.1:9/prices");
        assert_eq!(client.retry, RetryPolicy::Idempotent);
    }
}
