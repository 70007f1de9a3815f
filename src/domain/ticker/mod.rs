//! Ticker domain: the current-price snapshot shown outside the chart.

use crate::shared::Symbol;
use serde::{Deserialize, Serialize};

/// Latest point-in-time price per asset, as sent in `current_prices`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentPrices {
    #[serde(rename = "BTC")]
    pub btc: f64,
    #[serde(rename = "ETH")]
    pub eth: f64,
}

impl CurrentPrices {
    pub fn new(btc: f64, eth: f64) -> Self {
        Self { btc, eth }
    }

    pub fn get(&self, symbol: Symbol) -> f64 {
        match symbol {
            Symbol::Btc => self.btc,
            Symbol::Eth => self.eth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_prices_serde() {
        let prices: CurrentPrices = serde_json::from_str(r#"{"BTC": 64000.5, "ETH": 3100}"#).unwrap();
        assert_eq!(prices.get(Symbol::Btc), 64000.5);
        assert_eq!(prices.get(Symbol::Eth), 3100.0);
    }

    #[test]
    fn test_current_prices_requires_both_assets() {
        assert!(serde_json::from_str::<CurrentPrices>(r#"{"BTC": 64000.5}"#).is_err());
    }
}
