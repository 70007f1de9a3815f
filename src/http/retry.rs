//! Retry policies for feed requests.
//!
//! The feed is polled on a timer and a failed poll is simply followed by the
//! next one, so the default policy is [`RetryPolicy::None`].

use crate::error::HttpError;
use std::time::Duration;

/// Retry policy for a feed request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryPolicy {
    /// Single attempt. A failure surfaces immediately.
    #[default]
    None,
    /// Retry on transport failures, timeouts, 429 and 502/503/504.
    Idempotent,
    /// User-provided retry settings.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// Resolved settings, or `None` for a single attempt.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Whether to add ±25% jitter to the delay.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    /// Whether `err` is worth another attempt under this config.
    pub fn is_retryable(&self, err: &HttpError) -> bool {
        match err {
            HttpError::ServerError { status, .. } => self.retryable_statuses.contains(status),
            HttpError::RateLimited { .. } => self.retryable_statuses.contains(&429),
            HttpError::Timeout => true,
            #[cfg(feature = "http")]
            HttpError::Reqwest(re) => re.is_connect() || re.is_timeout() || re.is_request(),
            _ => false,
        }
    }

    /// Delay requested by a `Retry-After` header, capped at `max_delay`.
    pub fn rate_limit_delay(&self, retry_after_ms: u64) -> Duration {
        Duration::from_millis(retry_after_ms).min(self.max_delay)
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base =
            self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter(initial_ms: u64, max_ms: u64, factor: f64) -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_factor: factor,
            jitter: false,
            retryable_statuses: vec![502, 503, 504],
        }
    }

    #[test]
    fn test_default_policy_is_single_attempt() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::None);
        assert!(RetryPolicy::default().config().is_none());
    }

    #[test]
    fn test_idempotent_statuses() {
        let config = RetryPolicy::Idempotent.config().unwrap();
        for status in [429, 502, 503, 504] {
            assert!(config.retryable_statuses.contains(&status));
        }
    }

    #[test]
    fn test_is_retryable() {
        let config = no_jitter(100, 1000, 2.0);
        assert!(config.is_retryable(&HttpError::ServerError {
            status: 503,
            body: String::new()
        }));
        assert!(!config.is_retryable(&HttpError::ServerError {
            status: 500,
            body: String::new()
        }));
        assert!(config.is_retryable(&HttpError::Timeout));
        assert!(!config.is_retryable(&HttpError::NotFound("x".into())));
        assert!(!config.is_retryable(&HttpError::RateLimited { retry_after_ms: None }));
        assert!(RetryConfig::idempotent().is_retryable(&HttpError::RateLimited { retry_after_ms: None }));
    }

    #[test]
    fn test_delay_doubles() {
        let config = no_jitter(100, 10_000, 2.0);
        assert_eq!(config.delay_for_attempt(0).as_millis(), 100);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 200);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 400);
    }

    #[test]
    fn test_delay_caps_at_max() {
        let config = no_jitter(1000, 2000, 10.0);
        assert_eq!(config.delay_for_attempt(3).as_millis(), 2000);
    }

    #[test]
    fn test_rate_limit_delay_caps_at_max() {
        let config = no_jitter(100, 2_000, 2.0);
        assert_eq!(config.rate_limit_delay(500), Duration::from_millis(500));
        assert_eq!(config.rate_limit_delay(u64::MAX), Duration::from_millis(2_000));
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let config = RetryConfig {
            jitter: true,
            ..no_jitter(1000, 10_000, 1.0)
        };
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((750..=1250).contains(&ms), "delay {} out of range", ms);
        }
    }
}
