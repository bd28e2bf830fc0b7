//! Response bodies for the board API.

use serde::Serialize;

use crate::domain::{BoardStatus, Departure};
use crate::poller::BoardSnapshot;

/// All boards, in configured order.
#[derive(Debug, Serialize)]
pub struct BoardsResponse {
    pub boards: Vec<BoardView>,
}

/// One stop's board as the display renders it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    /// Stop display name
    pub name: String,

    /// Upstream stop identifier
    pub id: String,

    /// Maximum departures shown
    pub limit: usize,

    pub status: BoardStatus,

    /// Header text, e.g. "Updated 14:23:05"
    pub status_line: String,

    /// RFC 3339 time of the last successful fetch
    pub last_updated: Option<String>,

    pub departures: Vec<DepartureView>,
}

/// A departure row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureView {
    pub id: String,
    pub line: String,
    pub direction: String,

    /// Scheduled time in HH:MM
    pub planned_time: Option<String>,

    /// Predicted time in HH:MM
    pub actual_time: Option<String>,

    /// Signed minutes; negative is early
    pub delay_minutes: i64,

    /// Human label, e.g. "+3min" or "On time"
    pub punctuality: String,
}

impl BoardView {
    /// Create from a board snapshot.
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        let BoardSnapshot { stop, state } = snapshot;
        Self {
            name: stop.name().to_string(),
            id: stop.id().to_string(),
            limit: stop.limit(),
            status: state.status,
            status_line: state.status_line(),
            last_updated: state.last_updated.map(|at| at.to_rfc3339()),
            departures: state
                .departures
                .iter()
                .map(DepartureView::from_departure)
                .collect(),
        }
    }
}

impl DepartureView {
    /// Create from a domain departure.
    pub fn from_departure(departure: &Departure) -> Self {
        Self {
            id: departure.id.clone(),
            line: departure.line.clone(),
            direction: departure.direction.clone(),
            planned_time: departure.planned_time.clone(),
            actual_time: departure.actual_time.clone(),
            delay_minutes: departure.delay_minutes,
            punctuality: departure.punctuality().label(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
