//! Upstream departure-board payloads.
//!
//! The upstream schema is not contractually fixed: field names differ
//! between API versions and whole sub-objects may be missing. Departures
//! are therefore kept as untyped JSON and read through JSON pointers by
//! the converter, rather than mapped onto a rigid DTO.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paths at which a response body may carry its departures list, in
/// lookup order.
const DEPARTURE_LIST_PATHS: &[&str] = &["/departureboards/0/departures", "/departures"];

/// One departure exactly as the upstream sent it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawDeparture(Value);

impl RawDeparture {
    /// Wrap an upstream JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a nested field by JSON pointer (e.g. `/route/short_name`).
    ///
    /// Returns `None` for any missing step, including when the record is
    /// not an object at all.
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawDeparture {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Pull the departures list out of a response body.
///
/// Checks `departureboards[0].departures` first, then top-level
/// `departures`. A body with neither, or where the field is not an array,
/// yields an empty list: a board with nothing on it is not an error.
pub fn extract_departures(mut body: Value) -> Vec<RawDeparture> {
    for path in DEPARTURE_LIST_PATHS {
        if let Some(Value::Array(items)) = body.pointer_mut(path).map(Value::take) {
            return items.into_iter().map(RawDeparture).collect();
        }
    }
    Vec::new()
}
