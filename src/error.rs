//! Error types.

use thiserror::Error;

/// Static text shown to the user whenever a fetch fails, whatever the cause.
pub const USER_FACING_ERROR: &str = "Failed to fetch data. Please try again.";

/// Top-level error.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The single fetch-or-parse failure kind. Network, status and schema
    /// problems all land here; the wrapped cause is kept for logging only.
    #[error("Fetch failed: {0}")]
    FetchOrParse(#[from] HttpError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Poller error: {0}")]
    Poll(#[from] PollError),
}

impl FeedError {
    /// The message to surface to a user, independent of the cause.
    pub fn user_message(&self) -> &'static str {
        match self {
            FeedError::FetchOrParse(_) => USER_FACING_ERROR,
            FeedError::Config(_) => "Invalid configuration.",
            FeedError::Poll(_) => "Price updates are not running.",
        }
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Poller errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PollError {
    #[error("Poller is not running")]
    NotRunning,

    #[error("Command channel full")]
    Busy,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid endpoint URL {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Could not build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_user_message_is_static() {
        let not_found = FeedError::from(HttpError::NotFound("gone".into()));
        let server = FeedError::from(HttpError::ServerError {
            status: 502,
            body: "bad gateway".into(),
        });
        assert_eq!(not_found.user_message(), USER_FACING_ERROR);
        assert_eq!(server.user_message(), USER_FACING_ERROR);
    }

    #[test]
    fn test_decode_error_is_fetch_failure() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = FeedError::from(HttpError::from(parse));
        assert!(matches!(err, FeedError::FetchOrParse(HttpError::Decode(_))));
        assert!(err.to_string().starts_with("Fetch failed: Invalid response body"));
    }
}
