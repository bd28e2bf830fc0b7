//! Where pollers get their departures from.

use std::future::Future;

use crate::upstream::{BoardClient, MockBoardClient, RawDeparture, UpstreamError};

/// Provider of raw departure boards.
///
/// Implemented by the HTTP client and the fixture-backed mock; tests plug
/// in scripted sources.
pub trait DepartureSource: Send + Sync + 'static {
    /// Fetch up to `limit` raw departures for `stop_id`.
    fn fetch_departures(
        &self,
        stop_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawDeparture>, UpstreamError>> + Send;
}

impl DepartureSource for BoardClient {
    async fn fetch_departures(
        &self,
        stop_id: &str,
        limit: usize,
    ) -> Result<Vec<RawDeparture>, UpstreamError> {
        self.get_departures(stop_id, limit).await
    }
}

impl DepartureSource for MockBoardClient {
    async fn fetch_departures(
        &self,
        stop_id: &str,
        limit: usize,
    ) -> Result<Vec<RawDeparture>, UpstreamError> {
        self.get_departures(stop_id, limit).await
    }
}
