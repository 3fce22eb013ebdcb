//! Gate translation table and unitary equivalence.

use num_complex::Complex64;

use qcloud_adapter_braket::{BraketError, BraketGate, BraketOp, to_braket, translate_gate};
use qcloud_adapter_sim::gates::{equal_up_to_global_phase, matrix};
use qcloud_ir::{Circuit, Gate, GateKind, QubitId, UnitaryMatrix};

fn qubits(n: usize) -> Vec<QubitId> {
    (0..n as u32).map(QubitId).collect()
}

fn gate(kind: GateKind) -> Gate {
    let n = kind.num_qubits();
    Gate::new(kind, qubits(n)).unwrap()
}

fn supported_kinds() -> Vec<(GateKind, BraketGate)> {
    let (a, b, c) = (0.37, -1.21, 2.05);
    let hadamard = UnitaryMatrix::from_rows(vec![
        vec![Complex64::new(0.5_f64.sqrt(), 0.0), Complex64::new(0.5_f64.sqrt(), 0.0)],
        vec![Complex64::new(0.5_f64.sqrt(), 0.0), Complex64::new(-(0.5_f64.sqrt()), 0.0)],
    ])
    .unwrap();
    vec![
        (GateKind::I, BraketGate::I),
        (GateKind::H, BraketGate::H),
        (GateKind::X, BraketGate::X),
        (GateKind::Y, BraketGate::Y),
        (GateKind::Z, BraketGate::Z),
        (GateKind::S, BraketGate::S),
        (GateKind::T, BraketGate::T),
        (GateKind::Sdg, BraketGate::Si),
        (GateKind::Tdg, BraketGate::Ti),
        (GateKind::SX, BraketGate::V),
        (GateKind::SXdg, BraketGate::Vi),
        (GateKind::CNOT, BraketGate::CNot),
        (GateKind::CY, BraketGate::CY),
        (GateKind::CZ, BraketGate::CZ),
        (GateKind::CSX, BraketGate::CV),
        (GateKind::Swap, BraketGate::Swap),
        (GateKind::ISwap, BraketGate::ISwap),
        (GateKind::ECR, BraketGate::ECR),
        (GateKind::Toffoli, BraketGate::CCNot),
        (GateKind::Rx(a), BraketGate::Rx(a)),
        (GateKind::Ry(a), BraketGate::Ry(a)),
        (GateKind::Rz(a), BraketGate::Rz(a)),
        (GateKind::RXX(b), BraketGate::XX(b)),
        (GateKind::RYY(b), BraketGate::YY(b)),
        (GateKind::RZZ(b), BraketGate::ZZ(b)),
        (GateKind::RXXYY(c), BraketGate::XY(-c)),
        (GateKind::GPI(a), BraketGate::GPi(a)),
        (GateKind::GPI2(b), BraketGate::GPi2(b)),
        (GateKind::PRX(a, b), BraketGate::PRx(a, b)),
        (GateKind::MS(a, b, c), BraketGate::MS(a, b, c)),
        (GateKind::U3(a, b, c), BraketGate::U(a, b, c)),
        (
            GateKind::Unitary(hadamard.clone()),
            BraketGate::Unitary(hadamard),
        ),
    ]
}

#[test]
fn mapping_table() {
    for (kind, expected) in supported_kinds() {
        let source = gate(kind.clone());
        let translated = translate_gate(&source).unwrap();
        assert_eq!(translated.gate(), &expected, "{kind:?}");
        let targets: Vec<u32> = source.qubits().iter().map(|q| q.0).collect();
        assert_eq!(translated.target(), targets.as_slice());
    }
}

#[test]
fn translated_unitaries_match_up_to_global_phase() {
    for (kind, _) in supported_kinds() {
        let translated = translate_gate(&gate(kind.clone())).unwrap();
        assert!(
            equal_up_to_global_phase(&matrix(&kind), &translated.gate().matrix(), 1e-10),
            "{kind:?} -> {}",
            translated.gate()
        );
    }
}

#[test]
fn xy_angle_is_negated() {
    for theta in [0.1, 1.0, -2.5] {
        let translated = translate_gate(&gate(GateKind::RXXYY(theta))).unwrap();
        assert_eq!(translated.gate(), &BraketGate::XY(-theta));
    }
}

#[test]
fn unsupported_kinds_fail_with_their_name() {
    let cases = [
        (GateKind::CRx(0.2), "crx"),
        (GateKind::CRy(0.2), "cry"),
        (GateKind::CRz(0.2), "crz"),
        (GateKind::CU1(0.2), "cu1"),
        (GateKind::FSwap, "fswap"),
    ];
    for (kind, name) in cases {
        match translate_gate(&gate(kind)) {
            Err(BraketError::UnsupportedGate { gate, .. }) => assert_eq!(gate, name),
            other => panic!("expected UnsupportedGate for {name}, got {other:?}"),
        }
    }
}

#[test]
fn verbatim_box_never_contains_measurements() {
    let mut circuit = Circuit::new(3);
    circuit
        .h(QubitId(0))
        .unwrap()
        .cnot(QubitId(0), QubitId(1))
        .unwrap()
        .rz(0.4, QubitId(2))
        .unwrap();
    circuit.measure([QubitId(1)]).unwrap();
    circuit.measure([QubitId(0), QubitId(2)]).unwrap();

    let braket = to_braket(&circuit, true).unwrap();
    let ops = braket.ops();
    let start = ops
        .iter()
        .position(|op| *op == BraketOp::StartVerbatimBox)
        .unwrap();
    let end = ops
        .iter()
        .position(|op| *op == BraketOp::EndVerbatimBox)
        .unwrap();

    assert_eq!(start, 0);
    assert!(ops[start + 1..end].iter().all(|op| matches!(op, BraketOp::Gate(_))));
    assert_eq!(end - start - 1, 3);
    assert!(ops[end + 1..].iter().all(|op| matches!(op, BraketOp::Measure(_))));
    assert_eq!(ops.len(), end + 3);

    let plain = to_braket(&circuit, false).unwrap();
    assert!(!plain.has_verbatim_box());
    assert_eq!(plain.instructions().count(), 3);
}
