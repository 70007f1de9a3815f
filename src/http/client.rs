//! Low-level HTTP client: `FeedHttp`.
//!
//! Returns wire types; conversion to domain types happens in the
//! price history sub-client.

use crate::domain::price_history::wire::FeedResponse;
use crate::error::{ConfigError, HttpError};
use crate::http::retry::RetryPolicy;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for the price feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedHttp {
    endpoint_url: String,
    client: Client,
}

impl FeedHttp {
    /// `request_timeout` of `None` leaves requests without a deadline.
    ///
    /// A client that cannot be built is a configuration problem, not a
    /// failed fetch.
    pub fn new(endpoint_url: &str, request_timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().pool_max_idle_per_host(2);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint_url: endpoint_url.to_string(),
            client: builder.build().map_err(client_build_error)?,
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// `GET {endpoint}?range={range}`.
    pub async fn get_prices(
        &self,
        range: &str,
        retry: &RetryPolicy,
    ) -> Result<FeedResponse, HttpError> {
        self.get_with_retry(&[("range", range)], retry).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
        retry: &RetryPolicy,
    ) -> Result<T, HttpError> {
        let Some(config) = retry.config() else {
            return self.do_get(query).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_get::<T>(query).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if !(config.is_retryable(&e) && attempt < config.max_retries) {
                        return Err(e);
                    }

                    let delay = match &e {
                        HttpError::RateLimited {
                            retry_after_ms: Some(ms),
                        } => config.rate_limit_delay(*ms),
                        _ => config.delay_for_attempt(attempt),
                    };
                    tracing::debug!(
                        attempt = attempt + 1,
                        max = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying request to {}",
                        self.endpoint_url
                    );
                    futures_timer::Delay::new(delay).await;
                    last_error = Some(e);
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_get<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<T, HttpError> {
        tracing::debug!(url = %self.endpoint_url, ?query, "GET");

        let resp = self
            .client
            .get(&self.endpoint_url)
            .query(query)
            .send()
            .await
            .map_err(classify)?;
        let status = resp.status();

        if status.is_success() {
            let body = resp.text().await.map_err(classify)?;
            return Ok(serde_json::from_str(&body)?);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

fn client_build_error(e: reqwest::Error) -> ConfigError {
    ConfigError::HttpClient(e.to_string())
}

fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}
