//! Conversions from wire types to domain types for price history.

use super::wire::{FeedResponse, HistoricalEntry, WireObservation};
use super::{FeedSnapshot, Observation};
use crate::shared::Symbol;
use chrono::{DateTime, Utc};

impl TryFrom<WireObservation> for Observation {
    type Error = String;

    fn try_from(w: WireObservation) -> Result<Self, Self::Error> {
        let symbol = w
            .symbol
            .ok_or_else(|| "missing symbol".to_string())?
            .parse::<Symbol>()?;
        let price = w.price.ok_or_else(|| "missing or non-numeric price".to_string())?;
        Ok(Self {
            timestamp: w.timestamp,
            symbol,
            price,
        })
    }
}

impl FeedSnapshot {
    /// Build a snapshot from a decoded response, dropping unusable entries.
    pub fn from_response(resp: FeedResponse, fetched_at: DateTime<Utc>) -> Self {
        let total = resp.historical_prices.len();
        let observations: Vec<Observation> = resp
            .historical_prices
            .into_iter()
            .filter_map(|entry| match entry {
                HistoricalEntry::Observation(w) => match Observation::try_from(w) {
                    Ok(o) => Some(o),
                    Err(e) => {
                        tracing::warn!("Dropping price entry: {}", e);
                        None
                    }
                },
                HistoricalEntry::Malformed(raw) => {
                    tracing::warn!("Dropping malformed price entry: {}", raw);
                    None
                }
            })
            .collect();

        if observations.len() < total {
            tracing::debug!(
                kept = observations.len(),
                dropped = total - observations.len(),
                "Converted price history"
            );
        }

        Self {
            observations,
            current: resp.current_prices,
            fetched_at,
        }
    }
}
