//! HTTP client layer: `FeedHttp` with opt-in retry policies.

pub mod client;
pub mod retry;

pub use client::FeedHttp;
pub use retry::{RetryConfig, RetryPolicy};
