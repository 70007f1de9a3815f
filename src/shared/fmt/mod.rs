//! Human-readable number formatting for price cards and series tables.

pub mod num;

pub use num::{display_locale, display_usd, group_thousands};
