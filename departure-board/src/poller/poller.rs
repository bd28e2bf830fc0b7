//! Single-stop poller.
//!
//! A poller owns the refresh lifecycle of one stop's [`BoardState`]:
//!
//! ```text
//! Idle -> Loading -> Updated | Error
//!            ^           |
//!            +-- tick ---+
//! ```
//!
//! It fetches immediately on start and then on a fixed interval, whether
//! or not the previous fetch has resolved. Fetches run as separate tasks,
//! so a hung request never delays the timer. Results are applied only if
//! the poller has not been cancelled and no newer tick has already been
//! applied; both checks happen under the state channel's lock, so nothing
//! can slip in after [`Poller::cancel`] returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::{BoardState, Departure, StopDescriptor};
use crate::upstream::{UpstreamError, convert_board};

use super::config::MIN_INTERVAL;
use super::source::DepartureSource;

/// Result of one fetch, already normalized.
type FetchOutcome = Result<Vec<Departure>, UpstreamError>;

/// State shared between a poller handle and its timer task.
struct Shared {
    state: watch::Sender<BoardState>,
    cancelled: AtomicBool,
    /// Sequence number of the newest tick whose result was applied.
    last_applied: AtomicU64,
}

impl Shared {
    fn new() -> Self {
        let (state, _) = watch::channel(BoardState::default());
        Self {
            state,
            cancelled: AtomicBool::new(false),
            last_applied: AtomicU64::new(0),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Enter `Loading`. Returns false once cancelled.
    fn begin_loading(&self) -> bool {
        self.state.send_if_modified(|state| {
            if self.is_cancelled() {
                return false;
            }
            state.begin_loading();
            true
        })
    }

    /// Apply the outcome of tick `seq`. Returns whether the state changed.
    fn apply(&self, stop: &StopDescriptor, seq: u64, outcome: FetchOutcome) -> bool {
        self.state.send_if_modified(|state| {
            if self.is_cancelled() {
                debug!(stop_id = stop.id(), seq, "discarding fetch result after cancellation");
                return false;
            }
            if seq <= self.last_applied.load(Ordering::Acquire) {
                debug!(stop_id = stop.id(), seq, "discarding superseded fetch result");
                return false;
            }
            self.last_applied.store(seq, Ordering::Release);

            match outcome {
                Ok(departures) => {
                    debug!(stop_id = stop.id(), seq, count = departures.len(), "board updated");
                    state.record_success(departures, Local::now());
                }
                Err(err) => {
                    warn!(stop_id = stop.id(), seq, error = %err, "departure fetch failed");
                    state.record_failure();
                }
            }
            true
        })
    }

    /// Mark cancelled while holding the state lock, so that no `apply`
    /// can be halfway through.
    fn cancel(&self) {
        self.state.send_if_modified(|_| {
            self.cancelled.store(true, Ordering::Release);
            false
        });
    }
}

/// Handle to a running poller for one stop.
///
/// Dropping the handle cancels the poller.
pub struct Poller {
    stop: StopDescriptor,
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling `stop` now, then every `interval`.
    pub fn start<S: DepartureSource>(
        stop: StopDescriptor,
        source: Arc<S>,
        interval: Duration,
    ) -> Self {
        Self::start_after(stop, source, interval, Duration::ZERO)
    }

    /// Start polling `stop` after `delay`, then every `interval`.
    ///
    /// The board reports `Loading` from the moment this returns.
    pub fn start_after<S: DepartureSource>(
        stop: StopDescriptor,
        source: Arc<S>,
        interval: Duration,
        delay: Duration,
    ) -> Self {
        let shared = Arc::new(Shared::new());
        shared.begin_loading();

        let interval = interval.max(MIN_INTERVAL);
        info!(
            stop_id = stop.id(),
            stop = stop.name(),
            interval_secs = interval.as_secs_f64(),
            "poller started"
        );

        let task = tokio::spawn(run(
            stop.clone(),
            source,
            interval,
            delay,
            Arc::clone(&shared),
        ));

        Self {
            stop,
            shared,
            task: Some(task),
        }
    }

    /// The stop this poller refreshes.
    pub fn stop(&self) -> &StopDescriptor {
        &self.stop
    }

    /// Snapshot of the current board state.
    pub fn state(&self) -> BoardState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every board state change.
    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.shared.state.subscribe()
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }

    /// Stop the timer and abort in-flight fetches.
    ///
    /// The board state is frozen as of this call; results that still
    /// arrive are discarded. Idempotent.
    pub fn cancel(&self) {
        if !self.shared.is_cancelled() {
            info!(stop_id = self.stop.id(), "poller cancelled");
        }
        self.shared.cancel();
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Cancel and wait for the timer task to finish.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            // An aborted task reports a cancellation error; nothing to do.
            let _ = task.await;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Timer loop: spawn a fetch per tick and apply results as they land.
async fn run<S: DepartureSource>(
    stop: StopDescriptor,
    source: Arc<S>,
    interval: Duration,
    delay: Duration,
    shared: Arc<Shared>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + delay, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Dropped with this task on cancellation, which aborts every fetch.
    let mut in_flight: JoinSet<(u64, FetchOutcome)> = JoinSet::new();
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !shared.begin_loading() {
                    return;
                }
                seq += 1;
                let tick = seq;
                let source = Arc::clone(&source);
                let stop_id = stop.id().to_string();
                let limit = stop.limit();
                in_flight.spawn(async move {
                    let outcome = source
                        .fetch_departures(&stop_id, limit)
                        .await
                        .map(|raw| convert_board(&raw, limit));
                    (tick, outcome)
                });
            }
            Some(joined) = in_flight.join_next() => match joined {
                Ok((tick, outcome)) => {
                    shared.apply(&stop, tick, outcome);
                }
                Err(err) if err.is_panic() => {
                    warn!(stop_id = stop.id(), "fetch task panicked");
                }
                Err(_) => {}
            },
        }
    }
}
