//! Every gate kind either has an IonQ rule or fails with its name.

use qcloud_adapter_ionq::{IonQError, to_ionq, translate_gate};
use qcloud_ir::{Circuit, Gate, GateKind, QubitId};

fn all_kinds() -> Vec<GateKind> {
    vec![
        GateKind::I,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::H,
        GateKind::S,
        GateKind::Sdg,
        GateKind::T,
        GateKind::Tdg,
        GateKind::SX,
        GateKind::SXdg,
        GateKind::Rx(0.1),
        GateKind::Ry(0.2),
        GateKind::Rz(0.3),
        GateKind::U3(0.1, 0.2, 0.3),
        GateKind::GPI(0.4),
        GateKind::GPI2(0.5),
        GateKind::PRX(0.1, 0.2),
        GateKind::CNOT,
        GateKind::CY,
        GateKind::CZ,
        GateKind::CSX,
        GateKind::CRx(0.1),
        GateKind::CRy(0.1),
        GateKind::CRz(0.1),
        GateKind::CU1(0.1),
        GateKind::Swap,
        GateKind::ISwap,
        GateKind::FSwap,
        GateKind::ECR,
        GateKind::RXX(0.1),
        GateKind::RYY(0.1),
        GateKind::RZZ(0.1),
        GateKind::RXXYY(0.1),
        GateKind::MS(0.0, 0.0, 0.1),
        GateKind::Toffoli,
    ]
}

const UNSUPPORTED: &[&str] = &["prx", "cu1", "iswap", "fswap", "ecr", "rxxyy"];

#[test]
fn every_kind_is_decided() {
    for kind in all_kinds() {
        let qubits: Vec<QubitId> = (0..kind.num_qubits() as u32).map(QubitId).collect();
        let gate = Gate::new(kind.clone(), qubits.clone()).unwrap();
        match translate_gate(&gate, 7) {
            Ok(entries) => {
                assert!(!UNSUPPORTED.contains(&gate.name()), "{kind:?} should be rejected");
                for entry in &entries {
                    let touched: Vec<u32> = entry
                        .target
                        .iter()
                        .copied()
                        .chain(entry.targets.iter().flatten().copied())
                        .chain(entry.controls.iter().flatten().copied())
                        .collect();
                    assert!(touched.iter().all(|q| (*q as usize) < qubits.len()));
                }
            }
            Err(IonQError::UnsupportedGate { gate: name, position }) => {
                assert!(UNSUPPORTED.contains(&name.as_str()), "{kind:?} should translate");
                assert_eq!(position, 7);
            }
            Err(other) => panic!("unexpected error for {kind:?}: {other}"),
        }
    }
}

#[test]
fn ghz_keeps_gate_order() {
    let circuit = Circuit::ghz(4).unwrap();
    let input = to_ionq(&circuit).unwrap();
    assert_eq!(input.qubits, 4);
    assert_eq!(input.circuit.len(), 4);
    assert_eq!(input.circuit[0].gate, "h");
    for (i, entry) in input.circuit.iter().enumerate().skip(1) {
        assert_eq!(entry.gate, "x");
        assert_eq!(entry.controls.as_deref(), Some(&[i as u32 - 1][..]));
        assert_eq!(entry.target, Some(i as u32));
    }
}
