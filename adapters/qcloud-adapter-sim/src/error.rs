//! Error types for the local simulator.

use qcloud_hal::HalError;
use thiserror::Error;

/// Simulator configuration and execution errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// Noise type and Kraus operators both given, or neither.
    #[error("Need to specify noise type / Kraus operators.")]
    NoiseSource,

    /// Noise type given without a level.
    #[error("Need to specify noise level.")]
    MissingNoiseLevel,

    /// Noise level outside `[0, 1]`.
    #[error("Noise level needs to be between 0 and 1.")]
    NoiseLevelOutOfRange,

    /// Unrecognised noise channel name.
    #[error("Unknown noise type '{0}', expected one of [{types}]", types = crate::noise::NOISE_TYPES.join(", "))]
    UnknownNoiseType(String),

    /// Kraus operators that are not 2x2 or do not sum to the identity.
    #[error("Invalid Kraus operators: {0}")]
    InvalidKraus(String),

    /// Circuit wider than the simulator accepts.
    #[error("Circuit has {qubits} qubits but the simulator supports at most {max}")]
    TooManyQubits {
        /// Qubits in the circuit.
        qubits: usize,
        /// Simulator limit.
        max: usize,
    },
}

impl From<SimError> for HalError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::TooManyQubits { .. } => HalError::CircuitTooLarge(err.to_string()),
            other => HalError::Configuration(other.to_string()),
        }
    }
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
