//! Per-stop board state, as exposed to the presentation layer.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::departure::Departure;

/// Text shown while the first or next fetch is pending.
pub const LOADING_TEXT: &str = "Loading…";

/// Text shown after a failed fetch, whatever the cause.
pub const ERROR_TEXT: &str = "Error loading departures";

/// Lifecycle status of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardStatus {
    /// Poller created but not started.
    #[default]
    Idle,
    /// A fetch is pending.
    Loading,
    /// The last applied fetch succeeded.
    Updated,
    /// The last applied fetch failed.
    Error,
}

/// Latest observed departures and status for one stop.
///
/// Only the owning poller mutates this; everyone else sees snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub departures: Vec<Departure>,
    pub status: BoardStatus,
    /// When a fetch last succeeded.
    pub last_updated: Option<DateTime<Local>>,
}

impl BoardState {
    /// Mark a fetch as pending; shown departures stay until it resolves.
    pub fn begin_loading(&mut self) {
        self.status = BoardStatus::Loading;
    }

    /// Replace the departures with a fresh batch.
    pub fn record_success(&mut self, departures: Vec<Departure>, at: DateTime<Local>) {
        self.departures = departures;
        self.status = BoardStatus::Updated;
        self.last_updated = Some(at);
    }

    /// Drop all departures after a failed fetch.
    ///
    /// `last_updated` keeps the time of the last success.
    pub fn record_failure(&mut self) {
        self.departures.clear();
        self.status = BoardStatus::Error;
    }

    /// One-line status text for the board header.
    pub fn status_line(&self) -> String {
        match (self.status, self.last_updated) {
            (BoardStatus::Updated, Some(at)) => format!("Updated {}", at.format("%H:%M:%S")),
            (BoardStatus::Error, _) => ERROR_TEXT.to_string(),
            _ => LOADING_TEXT.to_string(),
        }
    }
}
