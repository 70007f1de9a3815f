//! Shared newtypes and utilities used across the domain modules.
//!
//! These types serialize to the same strings the feed and the chart axis use,
//! so they can appear directly in wire types and rendered output.

pub mod fmt;
pub mod serde_util;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── Symbol ──────────────────────────────────────────────────────────────────

/// One of the two tracked assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
}

impl Symbol {
    pub const ALL: [Symbol; 2] = [Symbol::Btc, Symbol::Eth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BTC" => Ok(Self::Btc),
            "ETH" => Ok(Self::Eth),
            other => Err(format!("Unknown symbol: {}", other)),
        }
    }
}

// ─── HourBucket ──────────────────────────────────────────────────────────────

/// Alignment key: the date and hour of a timestamp, minutes and seconds dropped.
///
/// Displays and serializes as `"YYYY-MM-DD HH"`. The wall-clock date and hour
/// written in the timestamp are used as-is; no time-zone conversion happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourBucket {
    date: NaiveDate,
    hour: u32,
}

impl HourBucket {
    /// Returns `None` when `hour` is not in `0..24`.
    pub fn new(date: NaiveDate, hour: u32) -> Option<Self> {
        (hour < 24).then_some(Self { date, hour })
    }

    /// Derive the bucket from an ISO-8601 date-time string.
    ///
    /// Accepts RFC 3339 (`2024-05-01T14:37:22Z`, `...+02:00`) and offset-less
    /// forms (`2024-05-01T14:37:22`, `2024-05-01T14:37`). Date-only strings have
    /// no time component and yield `None`, as does anything unparseable.
    pub fn from_timestamp(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let local = match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt.naive_local(),
            Err(_) => parse_with_offset(raw).or_else(|| parse_naive(raw))?,
        };
        Some(Self {
            date: local.date(),
            hour: local.hour(),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }
}

/// ISO 8601 forms RFC 3339 rejects, such as `+0000` offsets without a colon.
fn parse_with_offset(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];
    FORMATS
        .iter()
        .find_map(|fmt| chrono::DateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.naive_local())
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

impl std::fmt::Display for HourBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:02}", self.date.format("%Y-%m-%d"), self.hour)
    }
}

impl FromStr for HourBucket {
    type Err = String;

    /// Parses the display form `"YYYY-MM-DD HH"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, hour) = s
            .split_once(' ')
            .ok_or_else(|| format!("Invalid hour bucket: {}", s))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid hour bucket date {}: {}", date, e))?;
        let hour: u32 = hour
            .parse()
            .map_err(|e| format!("Invalid hour bucket hour {}: {}", hour, e))?;
        Self::new(date, hour).ok_or_else(|| format!("Hour out of range: {}", hour))
    }
}

impl Serialize for HourBucket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HourBucket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
