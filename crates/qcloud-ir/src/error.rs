//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building gates and circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Matrix is not a square matrix of dimension 2^n.
    #[error("Invalid unitary matrix: {0}")]
    InvalidMatrix(String),

    /// Gate parameter is NaN or infinite.
    #[error("Gate '{gate_name}' has a non-finite parameter")]
    NonFiniteParameter {
        /// Name of the gate.
        gate_name: String,
    },

    /// A qubit was measured twice.
    #[error("Qubit {0} is already measured")]
    AlreadyMeasured(QubitId),

    /// A gate was applied to a qubit after its measurement.
    #[error("Cannot apply '{gate_name}' to {qubit} after it was measured")]
    GateAfterMeasurement {
        /// Name of the gate.
        gate_name: String,
        /// The measured qubit.
        qubit: QubitId,
    },

    /// A measurement register name was reused.
    #[error("Measurement register '{0}' already exists")]
    DuplicateRegister(String),

    /// A measurement without qubits.
    #[error("Measurement register must contain at least one qubit")]
    EmptyMeasurement,
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
