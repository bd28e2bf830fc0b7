//! Domain error types.
//!
//! These errors represent invalid configuration of the boards themselves.
//! Upstream and transport failures live in [`crate::upstream::UpstreamError`].

/// Errors building stop descriptors or reading the stops file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StopError {
    /// Stop identifier is empty
    #[error("stop identifier must not be empty")]
    EmptyId,

    /// Limit of zero departures
    #[error("stop {0}: limit must be greater than zero")]
    ZeroLimit(String),

    /// Stops file could not be read
    #[error("cannot read stops file {path}: {message}")]
    Io { path: String, message: String },

    /// Stops file is not a JSON array of stops
    #[error("invalid stops file: {0}")]
    Parse(String),
}
