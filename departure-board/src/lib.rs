//! Live departure boards for public transit stops.
//!
//! Polls a departure board API for a fixed set of stops, normalizes the
//! loosely structured responses into uniform departure records, and keeps
//! an independently refreshed board per stop.

pub mod domain;
pub mod poller;
pub mod upstream;
pub mod web;
