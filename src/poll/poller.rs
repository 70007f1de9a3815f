//! Background polling task.
//!
//! - One fetch immediately on start, then one per interval tick
//! - Manual refreshes may overlap in-flight fetches
//! - Every fetch carries a generation; stale results never overwrite newer ones
//! - Explicit cancellation via `CancellationToken` on `stop()`
//! - Stream-based event delivery to the consumer

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_lock::RwLock;
use futures_util::stream::Stream;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::client::PriceFeedClient;
use crate::config::FeedConfig;
use crate::domain::price_history::{ApplyOutcome, ChartState, FeedSnapshot};
use crate::error::{FeedError, PollError};
use crate::poll::{FetchTrigger, PollEvent};

type FetchResult = (u64, Result<FeedSnapshot, FeedError>);

const EVENT_CAPACITY: usize = 256;
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Refresh,
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    client: PriceFeedClient,
    interval: Duration,
    chart: Arc<RwLock<ChartState>>,
    event_tx: mpsc::Sender<PollEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    cancel: CancellationToken,
    generation: Arc<AtomicU64>,
    in_flight: JoinSet<FetchResult>,
}

impl TaskState {
    fn emit(&self, event: PollEvent) {
        let _ = self.event_tx.try_send(event);
    }

    fn spawn_fetch(&mut self, trigger: FetchTrigger) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, ?trigger, in_flight = self.in_flight.len(), "Fetching prices");
        self.emit(PollEvent::FetchStarted {
            generation,
            trigger,
        });

        let client = self.client.clone();
        self.in_flight.spawn(async move {
            let result = client.price_history().fetch().await;
            (generation, result)
        });
    }

    async fn finish(&mut self, generation: u64, result: Result<FeedSnapshot, FeedError>) {
        if let Err(e) = &result {
            tracing::error!(generation, error = %e, "Error fetching data");
        }

        let outcome = self.chart.write().await.apply(generation, &result);
        let event = match (outcome, result) {
            (ApplyOutcome::Stale, _) => {
                tracing::warn!(generation, "Discarding stale fetch result");
                PollEvent::Stale { generation }
            }
            (ApplyOutcome::Applied, Ok(_)) => PollEvent::Updated { generation },
            (ApplyOutcome::Applied, Err(e)) => PollEvent::Failed {
                generation,
                message: e.user_message(),
                cause: e.to_string(),
            },
        };
        self.emit(event);
    }
}

// ─── Public Poller ───────────────────────────────────────────────────────────

/// Periodic price feed poller.
///
/// Owns a background tokio task once started. The chart state it updates is
/// shared through [`Poller::chart`].
pub struct Poller {
    client: PriceFeedClient,
    interval: Duration,
    chart: Arc<RwLock<ChartState>>,
    generation: Arc<AtomicU64>,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<PollEvent>>,
    event_tx: mpsc::Sender<PollEvent>,
    cancel: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Create a poller. Does not fetch until [`start`](Self::start).
    pub fn new(client: PriceFeedClient, interval: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CAPACITY);
        Self {
            client,
            interval,
            chart: Arc::new(RwLock::new(ChartState::new())),
            generation: Arc::new(AtomicU64::new(0)),
            cmd_tx: None,
            event_rx: tokio::sync::Mutex::new(event_rx),
            event_tx,
            cancel: CancellationToken::new(),
            task_handle: None,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self, FeedError> {
        config.validate()?;
        let client = PriceFeedClient::from_config(config)?;
        Ok(Self::new(client, config.poll_interval()))
    }

    /// Spawn the background task. The first fetch is issued immediately.
    /// Calling `start` on a running poller does nothing.
    pub fn start(&mut self) {
        if self.cmd_tx.is_some() {
            return;
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        self.cmd_tx = Some(cmd_tx);

        // Each run gets its own event channel.
        let (event_tx, event_rx) = mpsc::channel(EVENT_CAPACITY);
        self.event_tx = event_tx;
        self.event_rx = tokio::sync::Mutex::new(event_rx);

        let state = TaskState {
            client: self.client.clone(),
            interval: self.interval,
            chart: Arc::clone(&self.chart),
            event_tx: self.event_tx.clone(),
            cmd_rx,
            cancel: self.cancel.clone(),
            generation: Arc::clone(&self.generation),
            in_flight: JoinSet::new(),
        };

        tracing::info!(
            endpoint = self.client.endpoint_url(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting price poller"
        );
        self.task_handle = Some(tokio::spawn(run_task(state)));
    }

    /// Stop polling and wait for the background task to finish.
    ///
    /// In-flight fetches are aborted; their results are never applied.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        self.cmd_tx = None;

        if let Some(handle) = self.task_handle.take() {
            if !join_or_abort(handle, STOP_TIMEOUT).await {
                tracing::warn!("Price poller did not stop in time, aborted");
            }
        }
    }

    /// Issue an extra fetch right away, independent of the interval.
    pub fn refresh(&self) -> Result<(), PollError> {
        match &self.cmd_tx {
            Some(tx) => tx.try_send(Command::Refresh).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => PollError::Busy,
                mpsc::error::TrySendError::Closed(_) => PollError::NotRunning,
            }),
            None => Err(PollError::NotRunning),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Shared chart state updated by the background task.
    pub fn chart(&self) -> Arc<RwLock<ChartState>> {
        Arc::clone(&self.chart)
    }

    /// A copy of the current chart state.
    pub async fn chart_snapshot(&self) -> ChartState {
        self.chart.read().await.clone()
    }

    /// The most recently issued generation (0 before the first fetch).
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Get a stream of poller events.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `stop()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = PollEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

/// Wait up to `limit` for the task to finish, aborting it otherwise.
/// Returns whether it finished on its own.
async fn join_or_abort(mut handle: JoinHandle<()>, limit: Duration) -> bool {
    if tokio::time::timeout(limit, &mut handle).await.is_ok() {
        return true;
    }
    handle.abort();
    false
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    let mut ticker = tokio::time::interval(state.interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            // ── a) Teardown ──────────────────────────────────────────────
            _ = state.cancel.cancelled() => break,

            // ── b) Finished fetch ────────────────────────────────────────
            Some(joined) = state.in_flight.join_next(), if !state.in_flight.is_empty() => {
                match joined {
                    Ok((generation, result)) => state.finish(generation, result).await,
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => tracing::error!("Fetch task panicked: {}", e),
                }
            }

            // ── c) Command from public API ───────────────────────────────
            cmd = state.cmd_rx.recv() => {
                match cmd {
                    Some(Command::Refresh) => state.spawn_fetch(FetchTrigger::Manual),
                    // Poller dropped
                    None => break,
                }
            }

            // ── d) Interval tick (the first one fires immediately) ───────
            _ = ticker.tick() => state.spawn_fetch(FetchTrigger::Timer),
        }
    }

    state.in_flight.abort_all();
    tracing::info!("Price poller stopped");
    state.emit(PollEvent::Stopped);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poller() -> Poller {
        let client = PriceFeedClient::builder()
            .endpoint_url("http://127.0.0.1:9/prices")
            .build()
            .unwrap();
        Poller::new(client, Duration::from_secs(30))
    }

    #[test]
    fn test_poller_new_is_idle() {
        let p = poller();
        assert!(p.cmd_tx.is_none());
        assert!(!p.is_running());
        assert_eq!(p.latest_generation(), 0);
    }

    #[test]
    fn test_refresh_when_not_running() {
        let p = poller();
        assert_eq!(p.refresh(), Err(PollError::NotRunning));
    }

    #[tokio::test]
    async fn test_stop_when_not_started() {
        let mut p = poller();
        p.stop().await;
        assert!(!p.is_running());
    }

    #[tokio::test]
    async fn test_join_or_abort_aborts_stuck_task() {
        let (guard, dropped) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            std::future::pending::<()>().await;
        });

        assert!(!join_or_abort(handle, Duration::from_millis(10)).await);
        // The aborted task drops its future, and with it the sender.
        assert!(dropped.await.is_err());
    }

    #[tokio::test]
    async fn test_join_or_abort_finished_task() {
        let handle = tokio::spawn(async {});
        assert!(join_or_abort(handle, Duration::from_secs(1)).await);
    }

    #[test]
    fn test_from_config_rejects_zero_interval() {
        let config = FeedConfig {
            poll_interval_ms: 0,
            ..FeedConfig::default()
        };
        assert!(matches!(
            Poller::from_config(&config),
            Err(FeedError::Config(_))
        ));
    }
}
