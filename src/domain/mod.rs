//! Domain modules organized as vertical slices.
//!
//! A slice holds some of:
//! - `mod.rs`: Domain types
//! - `wire.rs`: Raw serde structs matching the feed response
//! - `convert.rs`: Conversions from wire to domain types
//! - `state.rs`: App-owned state containers with update methods
//! - `client.rs`: Sub-client with HTTP methods

pub mod price_history;
pub mod ticker;
