//! Circuit serialisation in the qibo `raw` JSON form.
//!
//! Every gate kind has a qibo counterpart, so serialisation never fails on
//! gates. Measurements become `measure` entries carrying their register name.

use serde::Serialize;
use serde_json::{Map, Value, json};

use qcloud_ir::{Circuit, GateKind, Instruction};

/// The serialised circuit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawCircuit {
    pub nqubits: usize,
    pub queue: Vec<RawGate>,
    pub density_matrix: bool,
}

/// One queue entry: gate name, target qubits and keyword parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawGate {
    pub name: String,
    pub init_args: Vec<u32>,
    pub init_kwargs: Map<String, Value>,
}

fn kwargs(kind: &GateKind) -> Map<String, Value> {
    let pairs: Vec<(&str, Value)> = match kind {
        GateKind::Rx(t)
        | GateKind::Ry(t)
        | GateKind::Rz(t)
        | GateKind::CRx(t)
        | GateKind::CRy(t)
        | GateKind::CRz(t)
        | GateKind::CU1(t)
        | GateKind::RXX(t)
        | GateKind::RYY(t)
        | GateKind::RZZ(t)
        | GateKind::RXXYY(t) => vec![("theta", json!(t))],
        GateKind::U3(theta, phi, lam) => {
            vec![("theta", json!(theta)), ("phi", json!(phi)), ("lam", json!(lam))]
        }
        GateKind::GPI(phi) | GateKind::GPI2(phi) => vec![("phi", json!(phi))],
        GateKind::PRX(theta, phi) => vec![("theta", json!(theta)), ("phi", json!(phi))],
        GateKind::MS(phi0, phi1, theta) => vec![
            ("phi0", json!(phi0)),
            ("phi1", json!(phi1)),
            ("theta", json!(theta)),
        ],
        GateKind::Unitary(matrix) => {
            let rows: Vec<Vec<[f64; 2]>> = matrix
                .rows()
                .map(|row| row.iter().map(|z| [z.re, z.im]).collect())
                .collect();
            vec![("matrix", json!(rows))]
        }
        _ => Vec::new(),
    };
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Serialise `circuit` in queue order.
pub fn to_raw(circuit: &Circuit) -> RawCircuit {
    let queue = circuit
        .instructions()
        .iter()
        .map(|instruction| match instruction {
            Instruction::Gate(gate) => RawGate {
                name: gate.name().to_string(),
                init_args: gate.qubits().iter().map(|q| q.0).collect(),
                init_kwargs: kwargs(gate.kind()),
            },
            Instruction::Measure(register) => {
                let mut init_kwargs = Map::new();
                init_kwargs.insert("register_name".into(), json!(register.name()));
                RawGate {
                    name: "measure".into(),
                    init_args: register.qubits().iter().map(|q| q.0).collect(),
                    init_kwargs,
                }
            }
        })
        .collect();

    RawCircuit {
        nqubits: circuit.num_qubits(),
        queue,
        density_matrix: false,
    }
}
