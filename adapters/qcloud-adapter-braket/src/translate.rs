//! Translation of qcloud circuits into Braket circuits.

use tracing::debug;

use qcloud_ir::{Circuit, Gate, GateKind, Instruction};

use crate::circuit::{BraketCircuit, BraketInstruction};
use crate::error::{BraketError, BraketResult};
use crate::gate::BraketGate;

/// Translate one gate into its Braket instruction.
///
/// `RXXYY(θ)` becomes `XY(-θ)`: Braket's `XY` rotates the `|01⟩, |10⟩`
/// subspace in the opposite sense.
pub fn translate_gate(gate: &Gate) -> BraketResult<BraketInstruction> {
    let braket = match gate.kind() {
        GateKind::I => BraketGate::I,
        GateKind::H => BraketGate::H,
        GateKind::X => BraketGate::X,
        GateKind::Y => BraketGate::Y,
        GateKind::Z => BraketGate::Z,
        GateKind::S => BraketGate::S,
        GateKind::Sdg => BraketGate::Si,
        GateKind::T => BraketGate::T,
        GateKind::Tdg => BraketGate::Ti,
        GateKind::SX => BraketGate::V,
        GateKind::SXdg => BraketGate::Vi,
        GateKind::CNOT => BraketGate::CNot,
        GateKind::CY => BraketGate::CY,
        GateKind::CZ => BraketGate::CZ,
        GateKind::CSX => BraketGate::CV,
        GateKind::Swap => BraketGate::Swap,
        GateKind::ISwap => BraketGate::ISwap,
        GateKind::ECR => BraketGate::ECR,
        GateKind::Toffoli => BraketGate::CCNot,
        GateKind::Rx(theta) => BraketGate::Rx(*theta),
        GateKind::Ry(theta) => BraketGate::Ry(*theta),
        GateKind::Rz(theta) => BraketGate::Rz(*theta),
        GateKind::RXX(theta) => BraketGate::XX(*theta),
        GateKind::RYY(theta) => BraketGate::YY(*theta),
        GateKind::RZZ(theta) => BraketGate::ZZ(*theta),
        GateKind::RXXYY(theta) => BraketGate::XY(-*theta),
        GateKind::GPI(phi) => BraketGate::GPi(*phi),
        GateKind::GPI2(phi) => BraketGate::GPi2(*phi),
        GateKind::PRX(theta, phi) => BraketGate::PRx(*theta, *phi),
        GateKind::MS(phi0, phi1, theta) => BraketGate::MS(*phi0, *phi1, *theta),
        GateKind::U3(theta, phi, lambda) => BraketGate::U(*theta, *phi, *lambda),
        GateKind::Unitary(matrix) => BraketGate::Unitary(matrix.clone()),
        GateKind::CRx(_)
        | GateKind::CRy(_)
        | GateKind::CRz(_)
        | GateKind::CU1(_)
        | GateKind::FSwap => {
            return Err(BraketError::UnsupportedGate {
                gate: gate.name().to_string(),
                position: None,
            });
        }
    };
    let target: Vec<u32> = gate.qubits().iter().map(|q| q.0).collect();
    BraketInstruction::new(braket, target)
}

/// Convert a circuit into a Braket circuit.
///
/// Gates are translated in queue order. With `verbatim` they are wrapped in
/// one verbatim box; measurements always follow, one group per register.
pub fn to_braket(circuit: &Circuit, verbatim: bool) -> BraketResult<BraketCircuit> {
    if !circuit.has_measurements() {
        return Err(BraketError::NoMeasurement);
    }

    let mut out = BraketCircuit::new();
    if verbatim {
        out.start_verbatim_box();
    }
    for (position, instruction) in circuit.instructions().iter().enumerate() {
        let Instruction::Gate(gate) = instruction else {
            continue;
        };
        let translated = translate_gate(gate).map_err(|e| match e {
            BraketError::UnsupportedGate { gate, .. } => BraketError::UnsupportedGate {
                gate,
                position: Some(position),
            },
            other => other,
        })?;
        out.add_instruction(translated);
    }
    if verbatim {
        out.end_verbatim_box();
    }
    for register in circuit.measurements() {
        out.measure(register.qubits().iter().map(|q| q.0).collect::<Vec<_>>());
    }

    debug!(
        "Translated '{}' into {} Braket instructions (verbatim: {verbatim})",
        circuit.name(),
        out.instructions().count()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::BraketOp;
    use qcloud_ir::QubitId;

    #[test]
    fn test_rxxyy_negates_angle() {
        let gate = Gate::new(GateKind::RXXYY(0.7), vec![QubitId(0), QubitId(1)]).unwrap();
        let inst = translate_gate(&gate).unwrap();
        assert_eq!(inst.gate(), &BraketGate::XY(-0.7));
        assert_eq!(inst.target(), &[0, 1]);
    }

    #[test]
    fn test_unsupported_gate_reports_position() {
        let mut circuit = Circuit::new(2);
        circuit.h(QubitId(0)).unwrap();
        circuit.crx(0.3, QubitId(0), QubitId(1)).unwrap();
        circuit.measure_all().unwrap();

        let err = to_braket(&circuit, false).unwrap_err();
        assert!(matches!(
            err,
            BraketError::UnsupportedGate { ref gate, position: Some(1) } if gate == "crx"
        ));
    }

    #[test]
    fn test_no_measurement_checked_first() {
        let mut circuit = Circuit::new(2);
        circuit.fswap(QubitId(0), QubitId(1)).unwrap();
        assert!(matches!(to_braket(&circuit, false), Err(BraketError::NoMeasurement)));
    }

    #[test]
    fn test_verbatim_box_wraps_gates_only() {
        let circuit = Circuit::bell().unwrap();
        let braket = to_braket(&circuit, true).unwrap();
        let ops = braket.ops();
        assert_eq!(ops.first(), Some(&BraketOp::StartVerbatimBox));
        assert_eq!(ops[3], BraketOp::EndVerbatimBox);
        assert_eq!(ops[4], BraketOp::Measure(vec![0, 1]));
        assert_eq!(ops.len(), 5);
    }

    #[test]
    fn test_one_measure_per_register() {
        let mut circuit = Circuit::new(3);
        circuit.x(QubitId(0)).unwrap();
        circuit.measure([QubitId(2)]).unwrap();
        circuit.measure([QubitId(0), QubitId(1)]).unwrap();

        let braket = to_braket(&circuit, false).unwrap();
        assert_eq!(braket.measured_qubits(), vec![2, 0, 1]);
        let groups = braket
            .ops()
            .iter()
            .filter(|op| matches!(op, BraketOp::Measure(_)))
            .count();
        assert_eq!(groups, 2);
    }
}
