//! Error types for the IonQ adapter.

use qcloud_hal::HalError;
use thiserror::Error;

/// Result type for IonQ operations.
pub type IonQResult<T> = Result<T, IonQError>;

/// Errors that can occur when talking to IonQ.
#[derive(Debug, Error)]
pub enum IonQError {
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

    /// Platform name IonQ does not know.
    #[error("Unknown IonQ platform '{0}', expected ionq_simulator or ionq_qpu[.<device>]")]
    UnknownPlatform(String),

    /// Gate without an IonQ rule.
    #[error("Unsupported gate '{gate}' at position {position}")]
    UnsupportedGate { gate: String, position: usize },

    /// Native and abstract gates in one circuit.
    #[error("Native gates (gpi, gpi2, ms) cannot be mixed with other gates")]
    MixedGateset,

    /// Result that cannot be mapped back onto the circuit.
    #[error("Malformed result: {0}")]
    MalformedResult(String),
}

impl From<IonQError> for HalError {
    fn from(e: IonQError) -> Self {
        match e {
            IonQError::Http(err) => HalError::Network(err),
            IonQError::Json(err) => HalError::Serialization(err),
            IonQError::ApiError { status: 401, .. } => HalError::AuthenticationFailed(e.to_string()),
            IonQError::JobNotFound(id) => HalError::JobNotFound(id),
            IonQError::UnknownPlatform(_) => HalError::Configuration(e.to_string()),
            IonQError::UnsupportedGate { gate, position } => HalError::UnsupportedGate {
                gate,
                position: Some(position),
            },
            IonQError::MixedGateset => HalError::InvalidCircuit(e.to_string()),
            _ => HalError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_gate_to_hal() {
        let hal: HalError = IonQError::UnsupportedGate {
            gate: "fswap".into(),
            position: 3,
        }
        .into();
        assert_eq!(hal.to_string(), "Unsupported gate 'fswap' at position 3");
    }

    #[test]
    fn test_unauthorized_to_hal() {
        let hal: HalError = IonQError::ApiError {
            status: 401,
            message: "bad key".into(),
        }
        .into();
        assert!(matches!(hal, HalError::AuthenticationFailed(msg) if msg.contains("bad key")));
    }

    #[test]
    fn test_platform_to_hal() {
        let hal: HalError = IonQError::UnknownPlatform("k2".into()).into();
        assert!(matches!(hal, HalError::Configuration(msg) if msg.contains("k2")));
    }
}
