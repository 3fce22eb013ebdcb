//! Error types for the HAL crate.

use qcloud_ir::QubitId;
use thiserror::Error;

/// Errors that can occur while constructing or running a client backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Client name outside the known set.
    #[error("Unsupported client '{name}', please pick one in [{}]", .supported.join(", "))]
    UnsupportedClient {
        /// The requested name.
        name: String,
        /// Every valid client name.
        supported: Vec<String>,
    },

    /// A credential was neither passed explicitly nor found in its variable.
    #[error("Missing credential: set the {var} environment variable or pass a token")]
    MissingCredential {
        /// Environment variable consulted.
        var: String,
    },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Circuit has no measurement register.
    #[error("No measurement found in the provided circuit.")]
    NoMeasurement,

    /// Feature accepted by the interface but not implemented.
    #[error("{0}")]
    NotImplemented(String),

    /// Gate without a translation rule for the target.
    #[error("Unsupported gate '{gate}'{}", format_position(.position))]
    UnsupportedGate {
        /// Gate mnemonic.
        gate: String,
        /// Queue position of the gate, when known.
        position: Option<usize>,
    },

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Qubit requested from an outcome that did not measure it.
    #[error("Qubit {0} was not measured")]
    QubitNotMeasured(QubitId),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Circuit construction error.
    #[error("Circuit error: {0}")]
    Ir(#[from] qcloud_ir::IrError),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

#[allow(clippy::ref_option)]
fn format_position(position: &Option<usize>) -> String {
    match position {
        Some(pos) => format!(" at position {pos}"),
        None => String::new(),
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
