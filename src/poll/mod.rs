//! Polling layer: the feed fetched on a fixed interval plus manual refreshes.
//!
//! [`Poller`] runs a background tokio task. This module defines the events it
//! emits to the consumer.

pub mod poller;

pub use poller::Poller;

/// What caused a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    /// Start-up or an interval tick.
    Timer,
    /// [`Poller::refresh`].
    Manual,
}

/// Events emitted by the poller to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// A fetch tagged `generation` was issued.
    FetchStarted {
        generation: u64,
        trigger: FetchTrigger,
    },
    /// The chart state now reflects the fetch tagged `generation`.
    Updated { generation: u64 },
    /// The fetch failed; the chart state carries the error message and keeps
    /// its previous data.
    Failed {
        generation: u64,
        message: &'static str,
        cause: String,
    },
    /// The fetch finished after a newer one had already been applied and was
    /// discarded.
    Stale { generation: u64 },
    /// The background task ended.
    Stopped,
}
