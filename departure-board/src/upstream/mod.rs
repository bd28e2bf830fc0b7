//! Departure board upstream.
//!
//! This module talks to the departure board API and turns its loosely
//! typed responses into canonical [`Departure`](crate::domain::Departure)
//! records.
//!
//! Key characteristics of the upstream:
//! - The departures list sits either at `departureboards[0].departures` or
//!   at top-level `departures`, depending on the API variant
//! - Field names for the line and headsign vary between variants
//! - Each departure may carry its own delay figure, which is authoritative
//!   when marked available

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{BoardClient, BoardConfig, DEFAULT_BASE_URL, parse_board_body};
pub use convert::{
    DIRECTION, FieldRule, LINE, PLACEHOLDER, PREDICTED, SCHEDULED, convert_board,
    convert_board_in, convert_departure, convert_departure_in, explicit_delay,
};
pub use error::UpstreamError;
pub use mock::MockBoardClient;
pub use types::{RawDeparture, extract_departures};
