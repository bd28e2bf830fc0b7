//! Application state for the web layer.

use std::sync::Arc;

use crate::poller::Aggregator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Pollers for every configured stop
    pub boards: Arc<Aggregator>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(boards: Arc<Aggregator>) -> Self {
        Self { boards }
    }
}
