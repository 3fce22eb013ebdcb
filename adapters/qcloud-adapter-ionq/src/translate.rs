//! Circuit conversion to the `ionq.circuit.v0` JSON format.
//!
//! | qcloud | IonQ | Notes |
//! |--------|------|-------|
//! | `x`, `y`, `z`, `h`, `s`, `t` | same | |
//! | `sdg`, `tdg`, `sx`, `sxdg` | `si`, `ti`, `v`, `vi` | |
//! | `cx`, `cy`, `cz`, `csx`, `ccx` | `x`, `y`, `z`, `v`, `x` | with `controls` |
//! | `crx`, `cry`, `crz` | `rx`, `ry`, `rz` | with `controls` |
//! | `rxx`, `ryy`, `rzz` | `xx`, `yy`, `zz` | |
//! | `u3(θ, φ, λ)` | `rz(λ) ry(θ) rz(φ)` | equal up to global phase |
//! | `gpi`, `gpi2`, `ms` | same, native gateset | angles in turns |
//! | `id` | dropped | |
//!
//! Every other gate is rejected.

use std::f64::consts::TAU;

use serde::Serialize;

use qcloud_ir::{Circuit, Gate, GateKind};

use crate::error::{IonQError, IonQResult};

/// Which IonQ gate vocabulary a circuit uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gateset {
    /// Abstract gates, compiled by IonQ.
    Qis,
    /// Hardware gates, run as is.
    Native,
}

/// One entry of the `circuit` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IonQGate {
    pub gate: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phases: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

impl IonQGate {
    fn on(gate: &'static str, target: u32) -> Self {
        Self {
            gate,
            target: Some(target),
            targets: None,
            controls: None,
            rotation: None,
            phase: None,
            phases: None,
            angle: None,
        }
    }

    fn pair(gate: &'static str, a: u32, b: u32) -> Self {
        Self {
            target: None,
            targets: Some(vec![a, b]),
            ..Self::on(gate, 0)
        }
    }

    fn controlled(mut self, controls: &[u32]) -> Self {
        self.controls = Some(controls.to_vec());
        self
    }

    fn rotation(mut self, theta: f64) -> Self {
        self.rotation = Some(theta);
        self
    }
}

/// The `input` object of a job request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IonQCircuit {
    pub format: &'static str,
    pub gateset: Gateset,
    pub qubits: usize,
    pub circuit: Vec<IonQGate>,
}

fn turns(radians: f64) -> f64 {
    radians / TAU
}

fn is_native(kind: &GateKind) -> bool {
    matches!(kind, GateKind::GPI(_) | GateKind::GPI2(_) | GateKind::MS(..))
}

/// Translate one gate. Identity yields no entry, `u3` yields three.
pub fn translate_gate(gate: &Gate, position: usize) -> IonQResult<Vec<IonQGate>> {
    let q: Vec<u32> = gate.qubits().iter().map(|q| q.0).collect();
    let one = |name: &'static str| -> IonQResult<Vec<IonQGate>> {
        Ok(vec![IonQGate::on(name, q[0])])
    };
    let controlled = |name: &'static str, theta: Option<f64>| -> IonQResult<Vec<IonQGate>> {
        let (controls, target) = q.split_at(q.len() - 1);
        let mut entry = IonQGate::on(name, target[0]).controlled(controls);
        entry.rotation = theta;
        Ok(vec![entry])
    };

    match gate.kind() {
        GateKind::I => Ok(Vec::new()),
        GateKind::X => one("x"),
        GateKind::Y => one("y"),
        GateKind::Z => one("z"),
        GateKind::H => one("h"),
        GateKind::S => one("s"),
        GateKind::Sdg => one("si"),
        GateKind::T => one("t"),
        GateKind::Tdg => one("ti"),
        GateKind::SX => one("v"),
        GateKind::SXdg => one("vi"),
        GateKind::Rx(theta) => Ok(vec![IonQGate::on("rx", q[0]).rotation(*theta)]),
        GateKind::Ry(theta) => Ok(vec![IonQGate::on("ry", q[0]).rotation(*theta)]),
        GateKind::Rz(theta) => Ok(vec![IonQGate::on("rz", q[0]).rotation(*theta)]),
        GateKind::U3(theta, phi, lambda) => Ok(vec![
            IonQGate::on("rz", q[0]).rotation(*lambda),
            IonQGate::on("ry", q[0]).rotation(*theta),
            IonQGate::on("rz", q[0]).rotation(*phi),
        ]),
        GateKind::CNOT | GateKind::Toffoli => controlled("x", None),
        GateKind::CY => controlled("y", None),
        GateKind::CZ => controlled("z", None),
        GateKind::CSX => controlled("v", None),
        GateKind::CRx(theta) => controlled("rx", Some(*theta)),
        GateKind::CRy(theta) => controlled("ry", Some(*theta)),
        GateKind::CRz(theta) => controlled("rz", Some(*theta)),
        GateKind::Swap => Ok(vec![IonQGate::pair("swap", q[0], q[1])]),
        GateKind::RXX(theta) => Ok(vec![IonQGate::pair("xx", q[0], q[1]).rotation(*theta)]),
        GateKind::RYY(theta) => Ok(vec![IonQGate::pair("yy", q[0], q[1]).rotation(*theta)]),
        GateKind::RZZ(theta) => Ok(vec![IonQGate::pair("zz", q[0], q[1]).rotation(*theta)]),
        GateKind::GPI(phi) => Ok(vec![IonQGate {
            phase: Some(turns(*phi)),
            ..IonQGate::on("gpi", q[0])
        }]),
        GateKind::GPI2(phi) => Ok(vec![IonQGate {
            phase: Some(turns(*phi)),
            ..IonQGate::on("gpi2", q[0])
        }]),
        GateKind::MS(phi0, phi1, theta) => Ok(vec![IonQGate {
            phases: Some(vec![turns(*phi0), turns(*phi1)]),
            angle: Some(turns(*theta)),
            ..IonQGate::pair("ms", q[0], q[1])
        }]),
        GateKind::PRX(..)
        | GateKind::CU1(_)
        | GateKind::ISwap
        | GateKind::FSwap
        | GateKind::ECR
        | GateKind::RXXYY(_)
        | GateKind::Unitary(_) => Err(IonQError::UnsupportedGate {
            gate: gate.name().to_string(),
            position,
        }),
    }
}

/// Convert the gate queue of `circuit`. Measurements are implicit: IonQ
/// reports every qubit and the outcome is restricted afterwards.
pub fn to_ionq(circuit: &Circuit) -> IonQResult<IonQCircuit> {
    let mut native = None;
    let mut entries = Vec::new();
    for (position, gate) in circuit.gates() {
        if matches!(gate.kind(), GateKind::I) {
            continue;
        }
        let this = is_native(gate.kind());
        if *native.get_or_insert(this) != this {
            return Err(IonQError::MixedGateset);
        }
        entries.extend(translate_gate(gate, position)?);
    }

    Ok(IonQCircuit {
        format: "ionq.circuit.v0",
        gateset: if native == Some(true) {
            Gateset::Native
        } else {
            Gateset::Qis
        },
        qubits: circuit.num_qubits(),
        circuit: entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcloud_ir::QubitId;
    use serde_json::json;

    #[test]
    fn test_bell_json() {
        let circuit = Circuit::bell().unwrap();
        let input = to_ionq(&circuit).unwrap();
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "format": "ionq.circuit.v0",
                "gateset": "qis",
                "qubits": 2,
                "circuit": [
                    {"gate": "h", "target": 0},
                    {"gate": "x", "target": 1, "controls": [0]}
                ]
            })
        );
    }

    #[test]
    fn test_toffoli_and_rotations() {
        let mut circuit = Circuit::new(3);
        circuit
            .toffoli(QubitId(0), QubitId(1), QubitId(2))
            .unwrap()
            .crz(0.5, QubitId(2), QubitId(0))
            .unwrap()
            .rzz(0.25, QubitId(1), QubitId(2))
            .unwrap()
            .i(QubitId(0))
            .unwrap();
        let input = to_ionq(&circuit).unwrap();
        let value = serde_json::to_value(&input.circuit).unwrap();
        assert_eq!(
            value,
            json!([
                {"gate": "x", "target": 2, "controls": [0, 1]},
                {"gate": "rz", "target": 0, "controls": [2], "rotation": 0.5},
                {"gate": "zz", "targets": [1, 2], "rotation": 0.25}
            ])
        );
    }

    #[test]
    fn test_u3_expands_to_three_rotations() {
        let mut circuit = Circuit::new(1);
        circuit.u3(0.1, 0.2, 0.3, QubitId(0)).unwrap();
        let gates = to_ionq(&circuit).unwrap().circuit;
        let names: Vec<_> = gates.iter().map(|g| (g.gate, g.rotation)).collect();
        assert_eq!(names, vec![("rz", Some(0.3)), ("ry", Some(0.1)), ("rz", Some(0.2))]);
    }

    #[test]
    fn test_native_gates_in_turns() {
        let mut circuit = Circuit::new(2);
        circuit
            .gpi(TAU / 4.0, QubitId(0))
            .unwrap()
            .ms(0.0, TAU / 2.0, TAU / 4.0, QubitId(0), QubitId(1))
            .unwrap();
        let input = to_ionq(&circuit).unwrap();
        assert_eq!(input.gateset, Gateset::Native);
        assert_eq!(input.circuit[0].phase, Some(0.25));
        assert_eq!(input.circuit[1].phases, Some(vec![0.0, 0.5]));
        assert_eq!(input.circuit[1].angle, Some(0.25));
    }

    #[test]
    fn test_mixed_gateset_rejected() {
        let mut circuit = Circuit::new(1);
        circuit.h(QubitId(0)).unwrap().gpi2(0.1, QubitId(0)).unwrap();
        assert!(matches!(to_ionq(&circuit), Err(IonQError::MixedGateset)));
    }

    #[test]
    fn test_unsupported_reports_position() {
        let mut circuit = Circuit::new(2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .iswap(QubitId(0), QubitId(1))
            .unwrap();
        match to_ionq(&circuit) {
            Err(IonQError::UnsupportedGate { gate, position }) => {
                assert_eq!(gate, "iswap");
                assert_eq!(position, 1);
            }
            other => panic!("expected UnsupportedGate, got {other:?}"),
        }
    }
}
