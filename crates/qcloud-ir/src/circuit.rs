//! High-level circuit builder API.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, UnitaryMatrix};
use crate::instruction::{Instruction, MeasurementRegister};
use crate::qubit::QubitId;

/// A quantum circuit over a fixed number of qubits.
///
/// Instructions are kept in insertion order, which is execution order.
/// Measurements are terminal: a measured qubit accepts no further gate and
/// no second measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: usize,
    queue: Vec<Instruction>,
    measured: FxHashSet<QubitId>,
}

impl Circuit {
    /// Create an empty circuit named `circuit`.
    pub fn new(num_qubits: usize) -> Self {
        Self::with_size("circuit", num_qubits)
    }

    /// Create an empty named circuit.
    pub fn with_size(name: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            queue: Vec::new(),
            measured: FxHashSet::default(),
        }
    }

    /// Append a validated gate.
    pub fn add(&mut self, gate: Gate) -> IrResult<&mut Self> {
        for &qubit in gate.qubits() {
            self.check_qubit(qubit, gate.name())?;
            if self.measured.contains(&qubit) {
                return Err(IrError::GateAfterMeasurement {
                    gate_name: gate.name().to_string(),
                    qubit,
                });
            }
        }
        self.queue.push(Instruction::Gate(gate));
        Ok(self)
    }

    /// Build a gate from a kind and operands and append it.
    pub fn gate(
        &mut self,
        kind: GateKind,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        self.add(Gate::new(kind, qubits)?)
    }

    fn check_qubit(&self, qubit: QubitId, gate_name: &str) -> IrResult<()> {
        if qubit.index() >= self.num_qubits {
            return Err(IrError::QubitNotFound {
                qubit,
                gate_name: Some(gate_name.to_string()),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn i(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::I, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Z, [qubit])
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::H, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::S, [qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Sdg, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::T, [qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Tdg, [qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::SX, [qubit])
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::SXdg, [qubit])
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Rx(theta), [qubit])
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Ry(theta), [qubit])
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Rz(theta), [qubit])
    }

    /// Apply U3(θ, φ, λ).
    pub fn u3(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::U3(theta, phi, lambda), [qubit])
    }

    /// Apply GPI(φ).
    pub fn gpi(&mut self, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::GPI(phi), [qubit])
    }

    /// Apply GPI2(φ).
    pub fn gpi2(&mut self, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::GPI2(phi), [qubit])
    }

    /// Apply PRX(θ, φ).
    pub fn prx(&mut self, theta: f64, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::PRX(theta, phi), [qubit])
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::CNOT, [control, target])
    }

    /// Apply controlled-Y.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::CY, [control, target])
    }

    /// Apply controlled-Z.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::CZ, [control, target])
    }

    /// Apply controlled sqrt(X).
    pub fn csx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::CSX, [control, target])
    }

    /// Apply controlled RX.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::CRx(theta), [control, target])
    }

    /// Apply controlled RY.
    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::CRy(theta), [control, target])
    }

    /// Apply controlled RZ.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::CRz(theta), [control, target])
    }

    /// Apply controlled phase.
    pub fn cu1(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::CU1(theta), [control, target])
    }

    /// Apply SWAP.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Swap, [q1, q2])
    }

    /// Apply iSWAP.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::ISwap, [q1, q2])
    }

    /// Apply fermionic SWAP.
    pub fn fswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::FSwap, [q1, q2])
    }

    /// Apply ECR.
    pub fn ecr(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::ECR, [q1, q2])
    }

    /// Apply XX rotation.
    pub fn rxx(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::RXX(theta), [q1, q2])
    }

    /// Apply YY rotation.
    pub fn ryy(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::RYY(theta), [q1, q2])
    }

    /// Apply ZZ rotation.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::RZZ(theta), [q1, q2])
    }

    /// Apply XX+YY rotation.
    pub fn rxxyy(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::RXXYY(theta), [q1, q2])
    }

    /// Apply Mølmer-Sørensen MS(φ0, φ1, θ).
    pub fn ms(
        &mut self,
        phi0: f64,
        phi1: f64,
        theta: f64,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(GateKind::MS(phi0, phi1, theta), [q1, q2])
    }

    // =========================================================================
    // Other gates
    // =========================================================================

    /// Apply Toffoli.
    pub fn toffoli(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(GateKind::Toffoli, [c1, c2, target])
    }

    /// Apply an arbitrary matrix. The first qubit is the most significant
    /// bit of the matrix index.
    pub fn unitary(
        &mut self,
        matrix: UnitaryMatrix,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.gate(GateKind::Unitary(matrix), qubits)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure qubits into a new register named `register{n}`, where `n` is
    /// the number of registers declared so far.
    pub fn measure(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        let name = format!("register{}", self.measurements().count());
        self.measure_into(name, qubits)
    }

    /// Measure qubits into a named register.
    pub fn measure_into(
        &mut self,
        name: impl Into<String>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let name = name.into();
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        if qubits.is_empty() {
            return Err(IrError::EmptyMeasurement);
        }
        if self.measurements().any(|r| r.name() == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        for (i, &qubit) in qubits.iter().enumerate() {
            self.check_qubit(qubit, "measure")?;
            if qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some("measure".into()),
                });
            }
            if self.measured.contains(&qubit) {
                return Err(IrError::AlreadyMeasured(qubit));
            }
        }
        self.measured.extend(qubits.iter().copied());
        self.queue
            .push(Instruction::Measure(MeasurementRegister::new(name, qubits)));
        Ok(self)
    }

    /// Measure every qubit, in index order, into one register.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<QubitId> = (0..self.num_qubits as u32).map(QubitId).collect();
        self.measure(qubits)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The instruction queue in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.queue
    }

    /// Gates with their queue position.
    pub fn gates(&self) -> impl Iterator<Item = (usize, &Gate)> {
        self.queue
            .iter()
            .enumerate()
            .filter_map(|(pos, inst)| match inst {
                Instruction::Gate(gate) => Some((pos, gate)),
                Instruction::Measure(_) => None,
            })
    }

    /// Measurement registers in declaration order.
    pub fn measurements(&self) -> impl Iterator<Item = &MeasurementRegister> {
        self.queue.iter().filter_map(|inst| match inst {
            Instruction::Measure(register) => Some(register),
            Instruction::Gate(_) => None,
        })
    }

    /// All measured qubits, register by register.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        self.measurements()
            .flat_map(|r| r.qubits().iter().copied())
            .collect()
    }

    /// Returns `true` when at least one register is declared.
    pub fn has_measurements(&self) -> bool {
        !self.measured.is_empty()
    }

    /// Number of gates, excluding measurements.
    pub fn gate_count(&self) -> usize {
        self.gates().count()
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a measured Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2);
        circuit
            .h(QubitId(0))?
            .cnot(QubitId(0), QubitId(1))?
            .measure_all()?;
        Ok(circuit)
    }

    /// Create a measured GHZ state circuit.
    pub fn ghz(n: usize) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 0..n as u32 - 1 {
            circuit.cnot(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new(3);
        assert_eq!(circuit.name(), "circuit");
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.instructions().is_empty());
        assert!(!circuit.has_measurements());
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.gate_count(), 2);
        assert_eq!(circuit.measured_qubits(), vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_fluent_api_keeps_order() {
        let mut circuit = Circuit::new(2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .rx(PI / 3.0, QubitId(1))
            .unwrap()
            .cnot(QubitId(0), QubitId(1))
            .unwrap();

        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["h", "rx", "cx"]);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::new(2);
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { qubit: QubitId(2), .. }));
    }

    #[test]
    fn test_default_register_names() {
        let mut circuit = Circuit::new(3);
        circuit.measure([QubitId(0)]).unwrap();
        circuit.measure([QubitId(2), QubitId(1)]).unwrap();

        let names: Vec<_> = circuit.measurements().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["register0", "register1"]);
        assert_eq!(
            circuit.measured_qubits(),
            vec![QubitId(0), QubitId(2), QubitId(1)]
        );
    }

    #[test]
    fn test_double_measurement_rejected() {
        let mut circuit = Circuit::new(2);
        circuit.measure([QubitId(0)]).unwrap();
        let err = circuit.measure([QubitId(0)]).unwrap_err();
        assert!(matches!(err, IrError::AlreadyMeasured(QubitId(0))));
    }

    #[test]
    fn test_register_name_reuse_rejected() {
        let mut circuit = Circuit::new(2);
        circuit.measure_into("m", [QubitId(0)]).unwrap();
        let err = circuit.measure_into("m", [QubitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateRegister(name) if name == "m"));
    }

    #[test]
    fn test_gate_after_measurement_rejected() {
        let mut circuit = Circuit::new(2);
        circuit.measure([QubitId(1)]).unwrap();
        assert!(circuit.x(QubitId(0)).is_ok());
        let err = circuit.x(QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::GateAfterMeasurement { .. }));
    }

    #[test]
    fn test_gate_positions_skip_nothing() {
        let mut circuit = Circuit::new(2);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure([QubitId(0)]).unwrap();
        circuit.x(QubitId(1)).unwrap();

        let positions: Vec<_> = circuit.gates().map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(4).unwrap();
        assert_eq!(circuit.gate_count(), 4);
        assert_eq!(circuit.measured_qubits().len(), 4);
        assert_eq!(Circuit::ghz(0).unwrap().gate_count(), 0);
    }
}
