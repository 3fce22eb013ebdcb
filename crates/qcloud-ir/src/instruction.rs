//! Queue entries of a circuit.

use serde::{Deserialize, Serialize};

use crate::gate::Gate;
use crate::qubit::QubitId;

/// A named group of measured qubits.
///
/// Column `i` of every sample row belongs to `qubits()[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementRegister {
    name: String,
    qubits: Vec<QubitId>,
}

impl MeasurementRegister {
    pub(crate) fn new(name: String, qubits: Vec<QubitId>) -> Self {
        Self { name, qubits }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Measured qubits in declaration order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }
}

/// One entry of the instruction queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// A unitary gate.
    Gate(Gate),
    /// A measurement of one register.
    Measure(MeasurementRegister),
}

impl Instruction {
    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Instruction::Gate(gate) => gate.name(),
            Instruction::Measure(_) => "measure",
        }
    }

    /// Qubits touched by the entry.
    pub fn qubits(&self) -> &[QubitId] {
        match self {
            Instruction::Gate(gate) => gate.qubits(),
            Instruction::Measure(register) => register.qubits(),
        }
    }

    /// Returns `true` for measurement entries.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Instruction::Measure(_))
    }
}
