//! Chart state container: app-owned, crate-provided update logic.

use super::{FeedSnapshot, SeriesOutput};
use crate::domain::ticker::CurrentPrices;
use crate::error::FeedError;
use chrono::{DateTime, Utc};

/// Result of offering a fetch result to [`ChartState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer generation was already applied; nothing changed.
    Stale,
}

/// What the chart and price cards currently show.
///
/// Every fetch is tagged with a generation from a monotonically increasing
/// counter. A result only lands if its generation is newer than the last one
/// applied, so a slow early request can never overwrite a faster later one.
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    series: SeriesOutput,
    current: Option<CurrentPrices>,
    error: Option<&'static str>,
    applied_generation: u64,
    last_updated: Option<DateTime<Utc>>,
}

impl ChartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the outcome of the fetch tagged `generation`.
    ///
    /// Success replaces series and current prices and clears the error.
    /// Failure only sets the error message; series and prices are untouched.
    pub fn apply(
        &mut self,
        generation: u64,
        result: &Result<FeedSnapshot, FeedError>,
    ) -> ApplyOutcome {
        if generation <= self.applied_generation {
            return ApplyOutcome::Stale;
        }
        self.applied_generation = generation;

        match result {
            Ok(snapshot) => {
                self.series = snapshot.series();
                self.current = Some(snapshot.current);
                self.error = None;
                self.last_updated = Some(snapshot.fetched_at);
            }
            Err(e) => {
                self.error = Some(e.user_message());
            }
        }
        ApplyOutcome::Applied
    }

    pub fn series(&self) -> &SeriesOutput {
        &self.series
    }

    pub fn current(&self) -> Option<&CurrentPrices> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn applied_generation(&self) -> u64 {
        self.applied_generation
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_history::Observation;
    use crate::error::{HttpError, USER_FACING_ERROR};
    use crate::shared::Symbol;

    fn snapshot(btc: f64) -> Result<FeedSnapshot, FeedError> {
        Ok(FeedSnapshot {
            observations: vec![Observation::new(Some("2024-01-01T00:05:00Z"), Symbol::Btc, btc)],
            current: CurrentPrices::new(btc, 2000.0),
            fetched_at: Utc::now(),
        })
    }

    fn failure() -> Result<FeedSnapshot, FeedError> {
        Err(HttpError::ServerError {
            status: 500,
            body: "boom".into(),
        }
        .into())
    }

    #[test]
    fn test_apply_success() {
        let mut state = ChartState::new();
        assert_eq!(state.apply(1, &snapshot(42000.0)), ApplyOutcome::Applied);
        assert_eq!(state.series().len(), 1);
        assert_eq!(state.current().unwrap().btc, 42000.0);
        assert!(state.error().is_none());
        assert!(state.last_updated().is_some());
        assert_eq!(state.applied_generation(), 1);
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut state = ChartState::new();
        state.apply(1, &snapshot(42000.0));
        assert_eq!(state.apply(2, &failure()), ApplyOutcome::Applied);
        assert_eq!(state.error(), Some(USER_FACING_ERROR));
        assert_eq!(state.series().values(Symbol::Btc), [Some(42000.0)]);
        assert_eq!(state.current().unwrap().btc, 42000.0);
    }

    #[test]
    fn test_success_clears_error() {
        let mut state = ChartState::new();
        state.apply(1, &failure());
        assert!(state.error().is_some());
        state.apply(2, &snapshot(1.0));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut state = ChartState::new();
        assert_eq!(state.apply(2, &snapshot(43000.0)), ApplyOutcome::Applied);
        assert_eq!(state.apply(1, &snapshot(42000.0)), ApplyOutcome::Stale);
        assert_eq!(state.apply(2, &failure()), ApplyOutcome::Stale);
        assert_eq!(state.current().unwrap().btc, 43000.0);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_clear() {
        let mut state = ChartState::new();
        state.apply(5, &snapshot(1.0));
        state.clear();
        assert!(state.series().is_empty());
        assert!(state.current().is_none());
        assert_eq!(state.applied_generation(), 0);
    }
}
