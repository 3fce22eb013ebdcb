//! Error types for the qibo cloud adapter.

use qcloud_hal::HalError;
use thiserror::Error;

/// Result type for qibo cloud operations.
pub type QiboResult<T> = Result<T, QiboError>;

/// Errors that can occur when talking to the qibo cloud.
#[derive(Debug, Error)]
pub enum QiboError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Completed job without usable measurements.
    #[error("Malformed result: {0}")]
    MalformedResult(String),
}

impl From<QiboError> for HalError {
    fn from(e: QiboError) -> Self {
        match e {
            QiboError::Http(err) => HalError::Network(err),
            QiboError::Json(err) => HalError::Serialization(err),
            QiboError::ApiError {
                status: 401 | 403, ..
            } => HalError::AuthenticationFailed(e.to_string()),
            QiboError::JobNotFound(id) => HalError::JobNotFound(id),
            QiboError::MalformedResult(_) | QiboError::ApiError { .. } => {
                HalError::Backend(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_is_authentication() {
        let hal: HalError = QiboError::ApiError {
            status: 403,
            message: "project not allowed".into(),
        }
        .into();
        assert!(matches!(hal, HalError::AuthenticationFailed(_)));
    }

    #[test]
    fn test_server_error_is_backend() {
        let hal: HalError = QiboError::ApiError {
            status: 500,
            message: "oops".into(),
        }
        .into();
        assert!(matches!(hal, HalError::Backend(msg) if msg.contains("500")));
    }
}
