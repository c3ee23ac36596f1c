//! RailRadar client error types.

/// Errors from the RailRadar client and its mock.
#[derive(Debug, thiserror::Error)]
pub enum RailRadarError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        /// Truncated excerpt of the offending body
        body: Option<String>,
    },

    /// API returned a non-success HTTP status without an error envelope
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// API returned an error envelope (`success: false`)
    #[error("upstream error {code}: {message}")]
    Upstream {
        code: String,
        message: String,
        status: Option<u16>,
    },

    /// No data for this train
    #[error("no running status for train {train}")]
    NotFound { train: String },

    /// Rate limited by the API
    #[error("rate limited by RailRadar API")]
    RateLimited,

    /// Missing or invalid API key
    #[error("unauthorized: check RAIL_RADAR_API_KEY")]
    Unauthorized,

    /// Mock data directory could not be loaded
    #[error("mock data error: {message}")]
    MockData { message: String },
}

impl RailRadarError {
    /// HTTP status the upstream reported, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            RailRadarError::Api { status, .. } => Some(*status),
            RailRadarError::Upstream { status, .. } => *status,
            RailRadarError::NotFound { .. } => Some(404),
            RailRadarError::RateLimited => Some(429),
            RailRadarError::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Build a [`RailRadarError::Json`] keeping the first 500 characters of the body.
    pub(crate) fn json(err: &serde_json::Error, body: &str) -> Self {
        RailRadarError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
