//! Departure board HTTP client.
//!
//! Issues `GET <endpoint>?ids=<stop>&limit=<n>` with a static access token
//! and returns the raw departures from either of the body shapes the
//! upstream uses.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use super::error::UpstreamError;
use super::types::{RawDeparture, extract_departures};

/// Default departure board endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.golemio.cz/v2/pid/departureboards";

/// Header carrying the access token.
const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Bytes of an unparseable body kept for diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the board client.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Static access token sent with every request
    pub access_token: String,
    /// Endpoint URL (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BoardConfig {
    /// Create a new config with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom endpoint (for testing or another deployment).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Departure board API client.
///
/// Cheap to clone; clones share the connection pool. Requests never wait
/// on each other, so a hung stop cannot hold up the rest.
#[derive(Debug, Clone)]
pub struct BoardClient {
    http: reqwest::Client,
    base_url: String,
}

impl BoardClient {
    /// Create a new client with the given configuration.
    pub fn new(config: BoardConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let token = HeaderValue::from_str(&config.access_token).map_err(|_| {
            UpstreamError::NotConfigured("access token is not a valid header value".to_string())
        })?;
        headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch up to `limit` raw departures for one stop.
    ///
    /// Transport failures, timeouts and non-2xx statuses are errors. A JSON
    /// body without a departures list is an empty board.
    pub async fn get_departures(
        &self,
        stop_id: &str,
        limit: usize,
    ) -> Result<Vec<RawDeparture>, UpstreamError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("ids", stop_id.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(UpstreamError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let departures = parse_board_body(&body)?;

        debug!(stop_id, count = departures.len(), "fetched departure board");
        Ok(departures)
    }
}

/// Parse a response body into raw departures.
pub fn parse_board_body(body: &str) -> Result<Vec<RawDeparture>, UpstreamError> {
    let value: Value = serde_json::from_str(body).map_err(|e| UpstreamError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
    })?;
    Ok(extract_departures(value))
}
