//! Price history domain: observations, hour-aligned series, chart state.

pub mod align;
#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::domain::ticker::CurrentPrices;
use crate::shared::Symbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use align::{align, BucketPrices, BucketedPrices, SeriesOutput, SeriesRecord};
pub use state::{ApplyOutcome, ChartState};

/// One timestamped price reading for one asset.
///
/// The timestamp is kept as received; the aligner decides whether it is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: Option<String>,
    pub symbol: Symbol,
    pub price: f64,
}

impl Observation {
    pub fn new(timestamp: Option<&str>, symbol: Symbol, price: f64) -> Self {
        Self {
            timestamp: timestamp.map(str::to_string),
            symbol,
            price,
        }
    }
}

/// Everything one successful fetch yields.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub observations: Vec<Observation>,
    pub current: CurrentPrices,
    pub fetched_at: DateTime<Utc>,
}

impl FeedSnapshot {
    /// Hour-aligned series for the snapshot's observations.
    pub fn series(&self) -> SeriesOutput {
        align(&self.observations)
    }
}
