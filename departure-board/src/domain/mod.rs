//! Domain types for departure boards.
//!
//! This module contains the canonical records the rest of the crate
//! produces and consumes: stops, departures and per-stop board state,
//! plus the timestamp and delay rules that feed them. Types that carry
//! invariants enforce them at construction time.

mod board;
mod delay;
mod departure;
mod error;
mod stop;
mod time;

pub use board::{BoardState, BoardStatus, ERROR_TEXT, LOADING_TEXT};
pub use delay::{ExplicitDelay, minutes_between, resolve_delay};
pub use departure::{Departure, Punctuality};
pub use error::StopError;
pub use stop::{
    MULTI_PANEL_LIMIT, SINGLE_PANEL_LIMIT, StopDescriptor, load_stops, parse_stops,
    reference_stops,
};
pub use time::{
    DISPLAY_FORMAT, Timestamp, format_in, format_local, parse_timestamp, parse_timestamp_in,
};
