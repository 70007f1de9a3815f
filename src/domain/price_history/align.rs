//! Series aligner: flat observations to hour-aligned chart series.
//!
//! Observations are grouped into [`HourBucket`]s in first-seen order. Each
//! bucket holds an optional price per asset; a later observation for the same
//! bucket and asset replaces the earlier one. Filtering then works on whole
//! records, so labels and values can never drift out of alignment.
//!
//! Zero is still treated as "no data" when deciding whether a record is kept,
//! which means a genuinely zero price is indistinguishable from absence for
//! filtering. Kept records do preserve the difference between an observed
//! `0.0` (`Some(0.0)`) and no observation at all (`None`).

use super::Observation;
use crate::shared::{HourBucket, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Bucketed prices ─────────────────────────────────────────────────────────

/// Both asset slots of one hour bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketPrices {
    pub btc: Option<f64>,
    pub eth: Option<f64>,
}

impl BucketPrices {
    pub fn get(&self, symbol: Symbol) -> Option<f64> {
        match symbol {
            Symbol::Btc => self.btc,
            Symbol::Eth => self.eth,
        }
    }

    pub fn set(&mut self, symbol: Symbol, price: f64) {
        match symbol {
            Symbol::Btc => self.btc = Some(price),
            Symbol::Eth => self.eth = Some(price),
        }
    }

    /// Zero-as-missing view: an absent slot reads as `0.0`.
    pub fn or_zero(&self, symbol: Symbol) -> f64 {
        self.get(symbol).unwrap_or(0.0)
    }

    /// Whether `symbol` has a usable (present and non-zero) price.
    pub fn has_price(&self, symbol: Symbol) -> bool {
        self.or_zero(symbol) != 0.0
    }

    /// Whether the bucket carries data for at least one asset.
    pub fn has_data(&self) -> bool {
        Symbol::ALL.iter().any(|s| self.has_price(*s))
    }
}

/// Insertion-ordered map from hour bucket to both asset prices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketedPrices {
    order: Vec<HourBucket>,
    prices: HashMap<HourBucket, BucketPrices>,
}

impl BucketedPrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket every observation with a usable timestamp.
    pub fn from_observations(observations: &[Observation]) -> Self {
        let mut bucketed = Self::new();
        for obs in observations {
            bucketed.insert(obs);
        }
        bucketed
    }

    /// Add one observation. Returns `false` when its timestamp is missing or
    /// unusable and the observation was skipped.
    pub fn insert(&mut self, obs: &Observation) -> bool {
        let Some(bucket) = obs.timestamp.as_deref().and_then(HourBucket::from_timestamp) else {
            tracing::debug!(timestamp = ?obs.timestamp, "Skipping observation without a usable timestamp");
            return false;
        };
        self.upsert(bucket, obs.symbol, obs.price);
        true
    }

    /// Create the bucket if needed, then overwrite the asset's slot.
    pub fn upsert(&mut self, bucket: HourBucket, symbol: Symbol, price: f64) {
        let order = &mut self.order;
        self.prices
            .entry(bucket)
            .or_insert_with(|| {
                order.push(bucket);
                BucketPrices::default()
            })
            .set(symbol, price);
    }

    pub fn get(&self, bucket: &HourBucket) -> Option<&BucketPrices> {
        self.prices.get(bucket)
    }

    /// Buckets in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (HourBucket, BucketPrices)> + '_ {
        self.order.iter().map(move |b| (*b, self.prices[b]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records for every bucket that has data, in first-seen order.
    pub fn into_series(self) -> SeriesOutput {
        let records = self
            .iter()
            .filter(|(_, prices)| prices.has_data())
            .map(|(label, prices)| SeriesRecord {
                label,
                btc: prices.btc,
                eth: prices.eth,
            })
            .collect();
        SeriesOutput { records }
    }
}

// ─── Series output ───────────────────────────────────────────────────────────

/// One chart row: a label and both asset values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub label: HourBucket,
    #[serde(rename = "BTC")]
    pub btc: Option<f64>,
    #[serde(rename = "ETH")]
    pub eth: Option<f64>,
}

impl SeriesRecord {
    pub fn get(&self, symbol: Symbol) -> Option<f64> {
        match symbol {
            Symbol::Btc => self.btc,
            Symbol::Eth => self.eth,
        }
    }
}

/// Hour-aligned series for both assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesOutput {
    records: Vec<SeriesRecord>,
}

impl SeriesOutput {
    pub fn records(&self) -> &[SeriesRecord] {
        &self.records
    }

    /// Label axis, one entry per record.
    pub fn labels(&self) -> Vec<HourBucket> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Values for one asset, index-aligned with [`labels`](Self::labels).
    pub fn values(&self, symbol: Symbol) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.get(symbol)).collect()
    }

    /// Points for a single-asset chart: only records where `symbol` has a
    /// non-zero price, each still paired with its own label.
    pub fn points(&self, symbol: Symbol) -> Vec<(HourBucket, f64)> {
        self.records
            .iter()
            .filter_map(|r| match r.get(symbol) {
                Some(p) if p != 0.0 => Some((r.label, p)),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Align observations into hour-bucketed series. Pure and infallible:
/// observations with unusable timestamps are skipped.
pub fn align(observations: &[Observation]) -> SeriesOutput {
    BucketedPrices::from_observations(observations).into_series()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(ts: Option<&str>, symbol: Symbol, price: f64) -> Observation {
        Observation::new(ts, symbol, price)
    }

    fn labels(series: &SeriesOutput) -> Vec<String> {
        series.labels().iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_single_bucket_end_to_end() {
        let input = vec![
            obs(Some("2024-01-01T00:05:00Z"), Symbol::Btc, 42000.0),
            obs(Some("2024-01-01T00:47:00Z"), Symbol::Eth, 2200.0),
        ];
        let series = align(&input);
        assert_eq!(labels(&series), ["2024-01-01 00"]);
        assert_eq!(series.values(Symbol::Btc), [Some(42000.0)]);
        assert_eq!(series.values(Symbol::Eth), [Some(2200.0)]);
    }

    #[test]
    fn test_every_bucket_has_both_placeholders() {
        let input = vec![
            obs(Some("2024-01-01T00:05:00Z"), Symbol::Btc, 42000.0),
            obs(Some("2024-01-01T01:05:00Z"), Symbol::Eth, 2200.0),
        ];
        let bucketed = BucketedPrices::from_observations(&input);
        assert_eq!(bucketed.len(), 2);
        for (_, prices) in bucketed.iter() {
            for symbol in Symbol::ALL {
                assert!(prices.or_zero(symbol).is_finite());
            }
        }
        let (_, first) = bucketed.iter().next().unwrap();
        assert_eq!(first.or_zero(Symbol::Eth), 0.0);
        assert_eq!(first.get(Symbol::Eth), None);
    }

    #[test]
    fn test_last_write_wins_within_bucket() {
        let input = vec![
            obs(Some("2024-05-01T14:01:00Z"), Symbol::Btc, 60000.0),
            obs(Some("2024-05-01T14:59:00Z"), Symbol::Btc, 61000.0),
            obs(Some("2024-05-01T14:30:00Z"), Symbol::Btc, 60500.0),
        ];
        let series = align(&input);
        assert_eq!(series.len(), 1);
        assert_eq!(series.values(Symbol::Btc), [Some(60500.0)]);
    }

    #[test]
    fn test_insertion_order_not_chronological() {
        let input = vec![
            obs(Some("2024-05-01T15:00:00Z"), Symbol::Btc, 2.0),
            obs(Some("2024-05-01T14:00:00Z"), Symbol::Btc, 1.0),
            obs(Some("2024-05-01T15:30:00Z"), Symbol::Eth, 3.0),
        ];
        let series = align(&input);
        assert_eq!(labels(&series), ["2024-05-01 15", "2024-05-01 14"]);
        assert_eq!(series.values(Symbol::Eth), [Some(3.0), None]);
    }

    #[test]
    fn test_both_zero_bucket_dropped_single_non_zero_kept() {
        let input = vec![
            obs(Some("2024-05-01T10:00:00Z"), Symbol::Btc, 0.0),
            obs(Some("2024-05-01T10:10:00Z"), Symbol::Eth, 0.0),
            obs(Some("2024-05-01T11:00:00Z"), Symbol::Btc, 0.0),
            obs(Some("2024-05-01T11:10:00Z"), Symbol::Eth, 3000.0),
        ];
        let series = align(&input);
        assert_eq!(labels(&series), ["2024-05-01 11"]);
        assert_eq!(series.values(Symbol::Btc), [Some(0.0)]);
        assert_eq!(series.values(Symbol::Eth), [Some(3000.0)]);
    }

    #[test]
    fn test_null_and_malformed_timestamps_contribute_nothing() {
        let input = vec![
            obs(None, Symbol::Btc, 1.0),
            obs(Some("garbage"), Symbol::Eth, 2.0),
            obs(Some("2024-05-01"), Symbol::Eth, 3.0),
        ];
        let bucketed = BucketedPrices::from_observations(&input);
        assert!(bucketed.is_empty());
        assert!(align(&input).is_empty());
    }

    #[test]
    fn test_compact_offsets_share_bucket() {
        let input = vec![
            obs(Some("2024-05-01T14:37:22+0000"), Symbol::Btc, 1.0),
            obs(Some("2024-05-01T14:50:00.5+0100"), Symbol::Eth, 2.0),
        ];
        let series = align(&input);
        assert_eq!(labels(&series), ["2024-05-01 14"]);
        assert_eq!(series.values(Symbol::Btc), [Some(1.0)]);
        assert_eq!(series.values(Symbol::Eth), [Some(2.0)]);
    }

    #[test]
    fn test_align_is_idempotent() {
        let input = vec![
            obs(Some("2024-05-01T10:00:00Z"), Symbol::Btc, 1.0),
            obs(None, Symbol::Eth, 9.0),
            obs(Some("2024-05-01T11:00:00Z"), Symbol::Eth, 2.0),
        ];
        assert_eq!(align(&input), align(&input));
    }

    #[test]
    fn test_outputs_stay_aligned() {
        let input = vec![
            obs(Some("2024-05-01T10:00:00Z"), Symbol::Btc, 1.0),
            obs(Some("2024-05-01T11:00:00Z"), Symbol::Eth, 2.0),
            obs(Some("2024-05-01T12:00:00Z"), Symbol::Btc, 3.0),
            obs(Some("2024-05-01T12:00:00Z"), Symbol::Eth, 4.0),
        ];
        let series = align(&input);
        let n = series.labels().len();
        assert_eq!(series.values(Symbol::Btc).len(), n);
        assert_eq!(series.values(Symbol::Eth).len(), n);
    }

    #[test]
    fn test_points_keep_labels_per_asset() {
        let input = vec![
            obs(Some("2024-05-01T10:00:00Z"), Symbol::Btc, 1.0),
            obs(Some("2024-05-01T11:00:00Z"), Symbol::Eth, 2.0),
            obs(Some("2024-05-01T12:00:00Z"), Symbol::Btc, 3.0),
        ];
        let series = align(&input);
        let btc: Vec<(String, f64)> = series
            .points(Symbol::Btc)
            .into_iter()
            .map(|(l, p)| (l.to_string(), p))
            .collect();
        assert_eq!(
            btc,
            [("2024-05-01 10".to_string(), 1.0), ("2024-05-01 12".to_string(), 3.0)]
        );
        assert_eq!(series.points(Symbol::Eth).len(), 1);
    }

    #[test]
    fn test_series_serde_shape() {
        let series = align(&[obs(Some("2024-01-01T00:05:00Z"), Symbol::Btc, 42000.0)]);
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"records": [{"label": "2024-01-01 00", "BTC": 42000.0, "ETH": null}]})
        );
    }
}
