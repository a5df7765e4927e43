//! Error types for fxgate.

use serde::Deserialize;

/// Result type for gateway operations.
pub type FxResult<T> = Result<T, FxError>;

/// Errors surfaced by the rate gateway and at startup.
///
/// Upstream failures are never retried or translated into defaults; they are
/// logged with operation context and handed back to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    /// Network-level failure reaching the upstream API.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// Upstream body was not valid JSON.
    #[error("malformed upstream response: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or invalid startup configuration. Fatal; the process must not
    /// bind any transport after this.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid URL in configuration.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl FxError {
    /// Build an `UpstreamStatus` error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        // Frankfurter error bodies look like {"message": "not found"}
        let message = match serde_json::from_str::<UpstreamErrorBody>(body) {
            Ok(parsed) => parsed.message,
            Err(_) => body.to_string(),
        };
        Self::UpstreamStatus { status, message }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: String,
}
