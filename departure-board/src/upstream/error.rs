//! Upstream client error types.

/// Errors from fetching a departure board.
///
/// Every variant is a failed fetch as far as a poller is concerned. A body
/// that parses but carries no departures list is not an error: it is an
/// empty board.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Invalid or missing access token
    #[error("unauthorized (check the access token)")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by the departure board API")]
    RateLimited,

    /// Response body is not JSON
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Client cannot be built from its configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl UpstreamError {
    /// HTTP status associated with the failure, if there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Http(e) => e.status().map(|s| s.as_u16()),
            UpstreamError::ApiError { status, .. } => Some(*status),
            UpstreamError::Unauthorized => Some(401),
            UpstreamError::RateLimited => Some(429),
            UpstreamError::Json { .. } | UpstreamError::NotConfigured(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UpstreamError::ApiError {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");
        assert_eq!(err.status(), Some(500));

        let err = UpstreamError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(
            err.to_string(),
            "JSON parse error: expected value (body: <html>)"
        );
        assert_eq!(err.status(), None);

        let err = UpstreamError::Json {
            message: "EOF".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "JSON parse error: EOF");

        assert_eq!(
            UpstreamError::Unauthorized.to_string(),
            "unauthorized (check the access token)"
        );
        assert_eq!(UpstreamError::RateLimited.status(), Some(429));
    }
}
