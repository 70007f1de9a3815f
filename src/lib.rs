//! # coinchart
//!
//! Polls a price-aggregation endpoint and turns its flat list of BTC/ETH
//! observations into hour-aligned series for charting, alongside the latest
//! current-price snapshot.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Shared newtypes, domain types, the series aligner, chart state
//! 2. **Config**: `FeedConfig` from defaults, JSON or environment
//! 3. **HTTP**: `FeedHttp` with opt-in retry policies
//! 4. **Client**: `PriceFeedClient` with nested sub-clients
//! 5. **Poller**: background tokio task with generation-gated state updates
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coinchart::prelude::*;
//!
//! let client = PriceFeedClient::builder().build()?;
//! let (series, current) = client.price_history().series().await?;
//!
//! let mut poller = Poller::new(client, std::time::Duration::from_secs(30));
//! poller.start();
//! poller.refresh()?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and formatting helpers.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Error types.
pub mod error;

/// Network constants.
pub mod network;

/// Plain-text rendering of the chart state.
pub mod render;

// ── Layer 2: Config ──────────────────────────────────────────────────────────

/// Feed configuration.
pub mod config;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `PriceFeedClient`: the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 5: Poller ──────────────────────────────────────────────────────────

/// Background polling task and its events.
#[cfg(feature = "poller")]
pub mod poll;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{HourBucket, Symbol};

    // Domain types
    pub use crate::domain::price_history::{
        align, ApplyOutcome, BucketPrices, BucketedPrices, ChartState, FeedSnapshot,
        Observation, SeriesOutput, SeriesRecord,
    };
    pub use crate::domain::ticker::CurrentPrices;

    // Errors
    pub use crate::error::{ConfigError, FeedError, HttpError, PollError, USER_FACING_ERROR};

    // Config + network
    pub use crate::config::FeedConfig;
    pub use crate::network::{DEFAULT_ENDPOINT_URL, DEFAULT_RANGE};

    // HTTP client
    #[cfg(feature = "http")]
    pub use crate::client::{PriceFeedClient, PriceFeedClientBuilder, PriceHistorySubClient};
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // Poller
    #[cfg(feature = "poller")]
    pub use crate::poll::{FetchTrigger, PollEvent, Poller};
}
