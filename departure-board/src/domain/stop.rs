//! Stop descriptors and the stops file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::StopError;

/// Departures requested per stop when several boards share a screen.
pub const MULTI_PANEL_LIMIT: usize = 6;

/// Departures requested when a single board fills the screen.
pub const SINGLE_PANEL_LIMIT: usize = 12;

/// A stop to poll: display name, upstream identifier and row limit.
///
/// Validated at construction: the identifier is non-empty and the limit
/// is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopDescriptor {
    name: String,
    id: String,
    limit: usize,
}

impl StopDescriptor {
    /// Create a stop descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use departure_board::domain::StopDescriptor;
    ///
    /// let stop = StopDescriptor::new("Na Pískách", "U40Z1P", 6).unwrap();
    /// assert_eq!(stop.id(), "U40Z1P");
    ///
    /// assert!(StopDescriptor::new("Nowhere", "", 6).is_err());
    /// assert!(StopDescriptor::new("Na Pískách", "U40Z1P", 0).is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        limit: usize,
    ) -> Result<Self, StopError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(StopError::EmptyId);
        }
        if limit == 0 {
            return Err(StopError::ZeroLimit(id));
        }
        Ok(Self {
            name: name.into(),
            id,
            limit,
        })
    }

    /// Display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque upstream stop identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Maximum number of departures requested.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// One entry of the stops file; `limit` falls back to a default.
#[derive(Debug, Deserialize)]
struct StopEntry {
    name: String,
    id: String,
    limit: Option<usize>,
}

/// Parse a JSON array of `{name, id, limit?}` objects.
pub fn parse_stops(json: &str, default_limit: usize) -> Result<Vec<StopDescriptor>, StopError> {
    let entries: Vec<StopEntry> =
        serde_json::from_str(json).map_err(|e| StopError::Parse(e.to_string()))?;

    entries
        .into_iter()
        .map(|e| StopDescriptor::new(e.name, e.id, e.limit.unwrap_or(default_limit)))
        .collect()
}

/// Load stops from a JSON file (see [`parse_stops`]).
pub fn load_stops(
    path: impl AsRef<Path>,
    default_limit: usize,
) -> Result<Vec<StopDescriptor>, StopError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| StopError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_stops(&json, default_limit)
}

/// The four corner boards of the reference deployment.
pub fn reference_stops(limit: usize) -> Vec<StopDescriptor> {
    [
        ("Na Pískách", "U40Z1P"),
        ("Na Pískách - Dědina", "U40Z2P"),
        ("Sušická - Bořislavka", "U3017Z1P"),
        ("Sušická - Hradčanská", "U3017Z2P"),
    ]
    .into_iter()
    .filter_map(|(name, id)| StopDescriptor::new(name, id, limit).ok())
    .collect()
}
