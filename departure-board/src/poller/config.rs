//! Polling configuration.

use std::time::Duration;

use crate::domain::MULTI_PANEL_LIMIT;

/// Refresh period of every board.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest refresh period accepted; shorter values are raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration shared by all pollers of an aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Fixed period between fetches, after success and failure alike.
    pub interval: Duration,

    /// Departures requested for stops that do not set their own limit.
    pub default_limit: usize,

    /// Delay between starting consecutive pollers.
    /// Zero starts every stop at once.
    pub stagger: Duration,
}

impl PollerConfig {
    /// Create a configuration with the given refresh period.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Set the default per-stop limit.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Set the start offset between consecutive pollers.
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// The refresh period actually used, never below [`MIN_INTERVAL`].
    pub fn effective_interval(&self) -> Duration {
        self.interval.max(MIN_INTERVAL)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            default_limit: MULTI_PANEL_LIMIT,
            stagger: Duration::ZERO,
        }
    }
}
