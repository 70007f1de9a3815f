//! Price history sub-client: one fetch of the feed.

use super::{FeedSnapshot, SeriesOutput};
use crate::client::PriceFeedClient;
use crate::domain::ticker::CurrentPrices;
use crate::error::FeedError;

/// Sub-client for price history operations.
pub struct PriceHistoryClient<'a> {
    pub(crate) client: &'a PriceFeedClient,
}

impl<'a> PriceHistoryClient<'a> {
    /// Fetch the one-day price history and current prices.
    ///
    /// Any transport, status or decode problem is reported as
    /// [`FeedError::FetchOrParse`].
    pub async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
        let resp = self
            .client
            .http
            .get_prices(&self.client.range, &self.client.retry)
            .await?;
        Ok(FeedSnapshot::from_response(resp, chrono::Utc::now()))
    }

    /// Fetch and align in one step.
    pub async fn series(&self) -> Result<(SeriesOutput, CurrentPrices), FeedError> {
        let snapshot = self.fetch().await?;
        Ok((snapshot.series(), snapshot.current))
    }
}
