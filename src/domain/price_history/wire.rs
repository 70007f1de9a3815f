//! Wire types for the price feed response.

use crate::domain::ticker::CurrentPrices;
use crate::shared::serde_util::{lenient_f64, lenient_string};
use serde::{Deserialize, Serialize};

/// Full response body of the feed endpoint.
///
/// Both top-level fields are required: a body without a `historical_prices`
/// array or a well-formed `current_prices` object fails to decode.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedResponse {
    pub historical_prices: Vec<HistoricalEntry>,
    pub current_prices: CurrentPrices,
}

/// One element of `historical_prices`.
///
/// Objects always decode as [`HistoricalEntry::Observation`] because all of
/// its fields are lenient; anything else (numbers, strings, null) is kept as
/// [`HistoricalEntry::Malformed`] and skipped during conversion.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HistoricalEntry {
    Observation(WireObservation),
    Malformed(serde_json::Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WireObservation {
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub price: Option<f64>,
}
