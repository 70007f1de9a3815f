//! Plain-text rendering of the chart state: price cards, the hourly series
//! table and the error banner.

use crate::domain::price_history::{ChartState, SeriesOutput};
use crate::domain::ticker::CurrentPrices;
use crate::shared::fmt::{display_locale, display_usd};
use crate::shared::Symbol;
use std::fmt::Write;

pub const LOADING_PRICES: &str = "Loading current prices...";
pub const NO_SERIES: &str = "No price history yet.";

/// `"BTC  $42,000"` / `"ETH  $2,200"`, one card per line.
pub fn price_cards(current: Option<&CurrentPrices>) -> String {
    let Some(current) = current else {
        return LOADING_PRICES.to_string();
    };
    Symbol::ALL
        .iter()
        .map(|s| format!("{}  ${}", s, display_locale(current.get(*s))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One row per hour bucket; absent values are shown as `-`.
pub fn series_table(series: &SeriesOutput) -> String {
    if series.is_empty() {
        return NO_SERIES.to_string();
    }

    let cell = |v: Option<f64>| v.map(display_usd).unwrap_or_else(|| "-".to_string());
    let rows: Vec<[String; 3]> = series
        .records()
        .iter()
        .map(|r| [r.label.to_string(), cell(r.btc), cell(r.eth)])
        .collect();

    let header = ["Hour", "BTC", "ETH"];
    let widths: Vec<usize> = (0..3)
        .map(|i| {
            rows.iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(header[i].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w0$}  {:>w1$}  {:>w2$}",
        header[0],
        header[1],
        header[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    );
    for row in &rows {
        let _ = writeln!(
            out,
            "{:<w0$}  {:>w1$}  {:>w2$}",
            row[0],
            row[1],
            row[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Cards, table and (if set) the error banner.
pub fn chart(state: &ChartState) -> String {
    let mut out = String::from("Current Prices:\n");
    out.push_str(&price_cards(state.current()));
    out.push_str("\n\n");
    out.push_str(&series_table(state.series()));
    if let Some(error) = state.error() {
        out.push_str("\n\n");
        out.push_str(error);
    }
    out
}
