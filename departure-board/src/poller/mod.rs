//! Board polling.
//!
//! One [`Poller`] per stop keeps that stop's [`BoardState`] fresh by
//! fetching on a fixed interval; the [`Aggregator`] starts and tears down
//! a set of them together.
//!
//! [`BoardState`]: crate::domain::BoardState

mod aggregator;
mod config;
#[allow(clippy::module_inception)]
mod poller;
mod source;


pub use aggregator::{Aggregator, BoardSnapshot};
pub use config::{DEFAULT_INTERVAL, MIN_INTERVAL, PollerConfig};
pub use poller::Poller;
pub use source::DepartureSource;
