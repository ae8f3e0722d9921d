//! API Errors
//!
//! Failure taxonomy shared by the HTTP wrapper, services and cache.

use serde::Deserialize;
use thiserror::Error;

/// Every failure a backend call can end in.
///
/// `Clone` because de-duplicated fetches hand the same result to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("session expired")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<serde_json::Value>,
    error: Option<String>,
}

impl ApiError {
    /// Map a non-2xx, non-401 response to an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| format!("HTTP {status}"));
        match status {
            400 | 422 => ApiError::Validation(message),
            _ => ApiError::Status { status, message },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Backends send `{"message": "..."}`, `{"message": ["...", "..."]}` or `{"error": "..."}`
fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.message {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => parsed.error,
    }
}
