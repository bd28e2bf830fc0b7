//! Mock board client for running without API access.
//!
//! Loads sample response bodies from JSON files and serves them as if they
//! were live API responses, through the same extraction path as
//! [`BoardClient`](super::BoardClient).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use super::error::UpstreamError;
use super::types::{RawDeparture, extract_departures};

/// Mock board client that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockBoardClient {
    /// Pre-loaded response bodies, keyed by stop identifier.
    boards: Arc<HashMap<String, Value>>,
}

impl MockBoardClient {
    /// Create a new mock client by loading JSON files from a directory.
    ///
    /// Expects files named `{stop id}.json` (e.g. `U40Z1P.json`), each
    /// holding a full response body.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, UpstreamError> {
        let boards = load_boards(data_dir.as_ref())?;
        Ok(Self {
            boards: Arc::new(boards),
        })
    }

    /// Fetch up to `limit` raw departures for one stop.
    ///
    /// Mimics [`BoardClient::get_departures`](super::BoardClient::get_departures);
    /// an unknown stop is a 404.
    pub async fn get_departures(
        &self,
        stop_id: &str,
        limit: usize,
    ) -> Result<Vec<RawDeparture>, UpstreamError> {
        let body = self.boards.get(stop_id).ok_or_else(|| UpstreamError::ApiError {
            status: 404,
            message: format!(
                "No mock data for stop {}. Available: {:?}",
                stop_id,
                self.boards.keys().collect::<Vec<_>>()
            ),
        })?;

        let mut departures = extract_departures(body.clone());
        departures.truncate(limit);
        Ok(departures)
    }

    /// List stops available in the mock data.
    pub fn available_stops(&self) -> Vec<String> {
        let mut stops: Vec<String> = self.boards.keys().cloned().collect();
        stops.sort();
        stops
    }
}

fn load_boards(data_dir: &Path) -> Result<HashMap<String, Value>, UpstreamError> {
    let mut boards = HashMap::new();

    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        UpstreamError::NotConfigured(format!("Failed to read mock data directory: {}", e))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            UpstreamError::NotConfigured(format!("Failed to read directory entry: {}", e))
        })?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let stop_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| UpstreamError::NotConfigured(format!("Invalid filename: {:?}", path)))?
            .to_string();

        let json = std::fs::read_to_string(&path).map_err(|e| {
            UpstreamError::NotConfigured(format!("Failed to read {:?}: {}", path, e))
        })?;

        let body: Value = serde_json::from_str(&json).map_err(|e| UpstreamError::Json {
            message: format!("{:?}: {}", path, e),
            body: None,
        })?;

        boards.insert(stop_id, body);
    }

    if boards.is_empty() {
        return Err(UpstreamError::NotConfigured(format!(
            "No mock board files found in {:?}",
            data_dir
        )));
    }

    Ok(boards)
}
