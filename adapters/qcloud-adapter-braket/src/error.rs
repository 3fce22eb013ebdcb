//! Error types for the Braket adapter.

use qcloud_hal::HalError;
use thiserror::Error;

/// Result type for Braket operations.
pub type BraketResult<T> = Result<T, BraketError>;

/// Errors that can occur when translating for or running on Amazon Braket.
#[derive(Debug, Error)]
pub enum BraketError {
    /// Gate without a Braket rule.
    #[error("Unsupported gate '{gate}'{}", format_position(.position))]
    UnsupportedGate {
        /// Gate mnemonic.
        gate: String,
        /// Queue position in the source circuit, when known.
        position: Option<usize>,
    },

    /// Braket gate name outside the supported set.
    #[error("Unknown Braket gate '{0}'")]
    UnknownGate(String),

    /// Instruction whose targets do not fit its gate.
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),

    /// Circuit without any measurement.
    #[error("No measurement found in the provided circuit.")]
    NoMeasurement,

    /// Feature accepted by the interface but not implemented.
    #[error("{0}")]
    NotImplemented(String),

    /// Missing S3 bucket configuration.
    #[error("S3 bucket not configured. Set QCLOUD_BRAKET_S3_BUCKET environment variable.")]
    MissingS3Bucket,

    /// Device selector that is neither `local`, a known name nor an ARN.
    #[error("Invalid device ARN: {0}")]
    InvalidDeviceArn(String),

    /// Braket API error.
    #[error("Braket API error: {0}")]
    BraketApi(String),

    /// S3 error.
    #[error("S3 error: {0}")]
    S3Error(String),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Task failed.
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Task was cancelled.
    #[error("Task was cancelled: {0}")]
    TaskCancelled(String),

    /// OpenQASM text rejected by the parser or the rewriter.
    #[error("OpenQASM error: {0}")]
    Qasm(#[from] qcloud_qasm::QasmError),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Circuit too large for the device.
    #[error("Circuit requires {required} qubits but device only has {available}")]
    TooManyQubits {
        /// Qubits needed.
        required: usize,
        /// Qubits available.
        available: usize,
    },

    /// Result parsing error.
    #[error("Failed to parse task result: {0}")]
    ResultParseError(String),
}

#[allow(clippy::ref_option)]
fn format_position(position: &Option<usize>) -> String {
    position.map_or_else(String::new, |p| format!(" at position {p}"))
}

impl From<BraketError> for HalError {
    fn from(e: BraketError) -> Self {
        match e {
            BraketError::UnsupportedGate { gate, position } => {
                HalError::UnsupportedGate { gate, position }
            }
            BraketError::UnknownGate(gate) => HalError::UnsupportedGate {
                gate,
                position: None,
            },
            BraketError::NoMeasurement => HalError::NoMeasurement,
            BraketError::NotImplemented(msg) => HalError::NotImplemented(msg),
            BraketError::MissingS3Bucket => HalError::MissingCredential {
                var: crate::api::S3_BUCKET_VAR.to_string(),
            },
            BraketError::TaskNotFound(id) => HalError::JobNotFound(id),
            BraketError::TaskFailed(msg) => HalError::JobFailed(msg),
            BraketError::TaskCancelled(_) => HalError::JobCancelled,
            BraketError::TooManyQubits { .. } => HalError::CircuitTooLarge(e.to_string()),
            BraketError::InvalidInstruction(msg) => HalError::InvalidCircuit(msg),
            BraketError::InvalidDeviceArn(msg) => HalError::Configuration(msg),
            BraketError::JsonError(err) => HalError::Serialization(err),
            _ => HalError::Backend(e.to_string()),
        }
    }
}
