//! Multi-stop aggregation.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::{BoardState, StopDescriptor};

use super::config::PollerConfig;
use super::poller::Poller;
use super::source::DepartureSource;

/// A stop together with a snapshot of its board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub stop: StopDescriptor,
    pub state: BoardState,
}

/// Owns one independent [`Poller`] per configured stop.
///
/// Stops share nothing but the departure source: one stop failing never
/// touches another's board. Dropping the aggregator cancels every poller.
pub struct Aggregator {
    pollers: Vec<Poller>,
}

impl Aggregator {
    /// Start a poller for each stop, in the given order.
    ///
    /// With a non-zero `config.stagger`, the n-th poller starts
    /// `n * stagger` after the first, spreading the initial request burst.
    pub fn start<S: DepartureSource>(
        stops: Vec<StopDescriptor>,
        source: Arc<S>,
        config: &PollerConfig,
    ) -> Self {
        let interval = config.effective_interval();

        let pollers: Vec<Poller> = stops
            .into_iter()
            .enumerate()
            .map(|(n, stop)| {
                let delay = config.stagger.saturating_mul(n as u32);
                Poller::start_after(stop, Arc::clone(&source), interval, delay)
            })
            .collect();

        info!(stops = pollers.len(), "aggregator started");
        Self { pollers }
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.pollers.len()
    }

    /// Whether there are no stops.
    pub fn is_empty(&self) -> bool {
        self.pollers.is_empty()
    }

    /// The pollers, in configured order.
    pub fn pollers(&self) -> &[Poller] {
        &self.pollers
    }

    /// Snapshot of every board, in configured order.
    pub fn boards(&self) -> Vec<BoardSnapshot> {
        self.pollers.iter().map(snapshot).collect()
    }

    /// Snapshot of one board by position.
    pub fn board(&self, index: usize) -> Option<BoardSnapshot> {
        self.pollers.get(index).map(snapshot)
    }

    /// One change receiver per board, in configured order.
    pub fn subscribe(&self) -> Vec<watch::Receiver<BoardState>> {
        self.pollers.iter().map(Poller::subscribe).collect()
    }

    /// Cancel every poller without waiting for their tasks.
    pub fn cancel_all(&self) {
        for poller in &self.pollers {
            poller.cancel();
        }
    }

    /// Cancel every poller and wait for all of them to stop.
    pub async fn shutdown(self) {
        let count = self.pollers.len();
        join_all(self.pollers.into_iter().map(Poller::shutdown)).await;
        info!(stops = count, "aggregator shut down");
    }

    /// Shut down through a shared handle.
    ///
    /// Waits for every poller when `boards` is the last handle; otherwise
    /// the pollers are cancelled without waiting.
    pub async fn shutdown_shared(boards: Arc<Self>) {
        match Arc::try_unwrap(boards) {
            Ok(aggregator) => aggregator.shutdown().await,
            Err(boards) => {
                warn!(
                    handles = Arc::strong_count(&boards),
                    "aggregator still shared, cancelling without waiting"
                );
                boards.cancel_all();
            }
        }
    }
}

fn snapshot(poller: &Poller) -> BoardSnapshot {
    BoardSnapshot {
        stop: poller.stop().clone(),
        state: poller.state(),
    }
}
