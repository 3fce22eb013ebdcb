//! Error types for the qiskit-style client.

use qcloud_hal::HalError;
use qcloud_qasm::QasmError;
use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors raised by the local providers and the IBM runtime client.
#[derive(Debug, Error)]
pub enum IbmError {
    /// Provider name outside the supported set.
    #[error("Unsupported provider '{0}', please pick one in [basic_simulator, aer_simulator, ibm-q]")]
    UnsupportedProvider(String),

    /// Remote provider without a backend name.
    #[error("The ibm-q provider needs a platform, e.g. 'ibm_torino'")]
    MissingPlatform,

    /// Optimisation level outside `0..=3`.
    #[error("optimization level needs to be between 0 to 3, inclusive of 0 and 3.")]
    InvalidOptimizationLevel(u8),

    /// Coupling requested without edges.
    #[error(
        "Expected qubit_map. E.g. qubit_map = [[0, 1], [0, 7], [1, 2], [2, 3], [4, 3], [4, 5], [6, 5], [7, 6]]"
    )]
    MissingQubitMap,

    /// Transpilation requested without a basis.
    #[error("Expected native gates for transpilation. E.g. native_gates = ['ecr', 'i', 'rz', 'sx', 'x']")]
    MissingNativeGates,

    /// Malformed option value.
    #[error("Invalid option '{key}': {message}")]
    InvalidOption {
        /// Option key.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// Gate outside the configured native set.
    #[error("Gate '{gate}' at position {position} is not in the native gate set")]
    NonNativeGate {
        /// Gate mnemonic.
        gate: String,
        /// Queue position.
        position: usize,
    },

    /// Two-qubit gate on qubits the coupling map does not connect.
    #[error("Gate '{gate}' at position {position} acts on uncoupled qubits {a} and {b}")]
    Uncoupled {
        /// Gate mnemonic.
        gate: String,
        /// Queue position.
        position: usize,
        /// First qubit.
        a: u32,
        /// Second qubit.
        b: u32,
    },

    /// Invalid API token.
    #[error("Invalid IBM Quantum API token")]
    InvalidToken,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// API returned an error.
    #[error("IBM Quantum API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Result payload that cannot be turned into samples.
    #[error("Malformed result: {0}")]
    MalformedResult(String),

    /// OpenQASM conversion error.
    #[error(transparent)]
    Qasm(#[from] QasmError),
}

impl From<IbmError> for HalError {
    fn from(err: IbmError) -> Self {
        match err {
            IbmError::UnsupportedProvider(_)
            | IbmError::MissingPlatform
            | IbmError::InvalidOptimizationLevel(_)
            | IbmError::MissingQubitMap
            | IbmError::MissingNativeGates
            | IbmError::InvalidOption { .. } => HalError::Configuration(err.to_string()),
            IbmError::NonNativeGate { gate, position } => HalError::UnsupportedGate {
                gate,
                position: Some(position),
            },
            IbmError::Uncoupled { .. } => HalError::InvalidCircuit(err.to_string()),
            IbmError::InvalidToken => HalError::AuthenticationFailed(err.to_string()),
            IbmError::ApiError { status: 401, message } => HalError::AuthenticationFailed(message),
            IbmError::HttpError(e) => HalError::Network(e),
            IbmError::JsonError(e) => HalError::Serialization(e),
            IbmError::JobNotFound(id) => HalError::JobNotFound(id),
            IbmError::Qasm(QasmError::Unsupported(message)) => HalError::Unsupported(message),
            IbmError::Qasm(QasmError::CircuitError(e)) => HalError::Ir(e),
            IbmError::Qasm(other) => HalError::InvalidCircuit(other.to_string()),
            other => HalError::Backend(other.to_string()),
        }
    }
}
