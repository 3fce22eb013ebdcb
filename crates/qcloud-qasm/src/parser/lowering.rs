//! Lowering of a parsed program to a [`Circuit`].

use rustc_hash::FxHashSet;
use tracing::warn;

use qcloud_ir::{Circuit, GateKind, QubitId};

use crate::ast::{GateCall, Program, Statement};
use crate::error::{QasmError, QasmResult};

/// Convert a program in the `qelib1` vocabulary into a circuit.
///
/// Measurements become one register per classical register, named after it;
/// untargeted measurements are collected into a default-named register.
pub fn lower_to_circuit(program: &Program) -> QasmResult<Circuit> {
    let mut circuit = Circuit::new(program.num_qubits()? as usize);
    let mut measured = FxHashSet::default();

    for statement in program.operations() {
        match statement {
            Statement::Gate(call) => {
                let kind = gate_kind(call)?;
                let qubits = call
                    .qubits
                    .iter()
                    .map(|q| program.resolve_qubit(q).map(QubitId))
                    .collect::<QasmResult<Vec<_>>>()?;
                if let Some(q) = qubits.iter().find(|q| measured.contains(*q)) {
                    return Err(QasmError::Unsupported(format!(
                        "gate '{}' on {q} after its measurement",
                        call.name
                    )));
                }
                circuit.gate(kind, qubits)?;
            }
            Statement::Measure { qubit, .. } => {
                measured.insert(QubitId(program.resolve_qubit(qubit)?));
            }
            Statement::Pragma(text) => warn!("Ignoring pragma '{text}'"),
            Statement::QubitDecl { .. }
            | Statement::ClassicalDecl { .. }
            | Statement::Barrier(_)
            | Statement::Verbatim(_) => {}
        }
    }

    for (name, qubits) in program.measurement_groups()? {
        let qubits = qubits.into_iter().map(QubitId);
        if name.is_empty() {
            circuit.measure(qubits)?;
        } else {
            circuit.measure_into(name, qubits)?;
        }
    }

    Ok(circuit)
}

/// Map a `qelib1` gate name and its evaluated parameters to a gate kind.
pub fn gate_kind(call: &GateCall) -> QasmResult<GateKind> {
    let params: Vec<f64> = call.params.iter().map(|e| e.eval()).collect();
    let expect = |n: usize| -> QasmResult<()> {
        if params.len() == n {
            Ok(())
        } else {
            Err(QasmError::WrongParameterCount {
                gate: call.name.clone(),
                expected: n,
                got: params.len(),
            })
        }
    };

    let fixed = match call.name.as_str() {
        "id" => Some(GateKind::I),
        "x" => Some(GateKind::X),
        "y" => Some(GateKind::Y),
        "z" => Some(GateKind::Z),
        "h" => Some(GateKind::H),
        "s" => Some(GateKind::S),
        "sdg" => Some(GateKind::Sdg),
        "t" => Some(GateKind::T),
        "tdg" => Some(GateKind::Tdg),
        "sx" => Some(GateKind::SX),
        "sxdg" => Some(GateKind::SXdg),
        "cx" | "CX" => Some(GateKind::CNOT),
        "cy" => Some(GateKind::CY),
        "cz" => Some(GateKind::CZ),
        "csx" => Some(GateKind::CSX),
        "swap" => Some(GateKind::Swap),
        "iswap" => Some(GateKind::ISwap),
        "fswap" => Some(GateKind::FSwap),
        "ecr" => Some(GateKind::ECR),
        "ccx" => Some(GateKind::Toffoli),
        _ => None,
    };
    if let Some(kind) = fixed {
        expect(0)?;
        return Ok(kind);
    }

    let kind = match call.name.as_str() {
        "rx" | "ry" | "rz" | "gpi" | "gpi2" | "crx" | "cry" | "crz" | "cu1" | "cp" | "rxx"
        | "ryy" | "rzz" | "rxxyy" => {
            expect(1)?;
            let p = params[0];
            match call.name.as_str() {
                "rx" => GateKind::Rx(p),
                "ry" => GateKind::Ry(p),
                "rz" => GateKind::Rz(p),
                "gpi" => GateKind::GPI(p),
                "gpi2" => GateKind::GPI2(p),
                "crx" => GateKind::CRx(p),
                "cry" => GateKind::CRy(p),
                "crz" => GateKind::CRz(p),
                "cu1" | "cp" => GateKind::CU1(p),
                "rxx" => GateKind::RXX(p),
                "ryy" => GateKind::RYY(p),
                "rzz" => GateKind::RZZ(p),
                _ => GateKind::RXXYY(p),
            }
        }
        "prx" => {
            expect(2)?;
            GateKind::PRX(params[0], params[1])
        }
        "u3" | "u" | "U" => {
            expect(3)?;
            GateKind::U3(params[0], params[1], params[2])
        }
        "ms" => {
            expect(3)?;
            GateKind::MS(params[0], params[1], params[2])
        }
        other => return Err(QasmError::UnknownGate(other.to_string())),
    };
    Ok(kind)
}
