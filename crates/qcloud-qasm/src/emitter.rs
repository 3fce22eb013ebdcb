//! OpenQASM emitters for [`Circuit`].

use qcloud_ir::{Circuit, Gate, GateKind};

use crate::error::{QasmError, QasmResult};

/// Emit OpenQASM 2.0 in the `qelib1` dialect.
///
/// Layout: header, one `qreg q[n]`, one `creg` per measurement register,
/// every gate in queue order, then one `measure q[i] -> reg[j]` per measured
/// qubit.
pub fn emit_qasm2(circuit: &Circuit) -> QasmResult<String> {
    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n");
    out.push_str(&format!("qreg q[{}];\n", circuit.num_qubits()));
    for register in circuit.measurements() {
        out.push_str(&format!("creg {}[{}];\n", register.name(), register.qubits().len()));
    }

    for (_, gate) in circuit.gates() {
        emit_gate(&mut out, gate, ",")?;
    }

    for register in circuit.measurements() {
        for (bit, qubit) in register.qubits().iter().enumerate() {
            out.push_str(&format!("measure q[{}] -> {}[{bit}];\n", qubit.0, register.name()));
        }
    }

    Ok(out)
}

/// Emit OpenQASM 3.0 with `stdgates.inc`, as accepted by IBM runtime
/// primitives. Each measurement register becomes a `bit[k]` array.
pub fn emit_qasm3(circuit: &Circuit) -> QasmResult<String> {
    let mut out = String::new();
    out.push_str("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n");
    for register in circuit.measurements() {
        out.push_str(&format!("bit[{}] {};\n", register.qubits().len(), register.name()));
    }
    out.push_str(&format!("qubit[{}] q;\n", circuit.num_qubits()));

    for (_, gate) in circuit.gates() {
        emit_gate(&mut out, gate, ", ")?;
    }

    for register in circuit.measurements() {
        for (bit, qubit) in register.qubits().iter().enumerate() {
            out.push_str(&format!("{}[{bit}] = measure q[{}];\n", register.name(), qubit.0));
        }
    }

    Ok(out)
}

fn emit_gate(out: &mut String, gate: &Gate, separator: &str) -> QasmResult<()> {
    if let GateKind::Unitary(_) = gate.kind() {
        return Err(QasmError::Unsupported(
            "arbitrary unitaries have no OpenQASM 2 form".into(),
        ));
    }

    out.push_str(gate.name());
    let params = gate.parameters();
    if !params.is_empty() {
        let params: Vec<String> = params.iter().map(|p| format_param(*p)).collect();
        out.push_str(&format!("({})", params.join(", ")));
    }
    let operands: Vec<String> = gate.qubits().iter().map(|q| format!("q[{}]", q.0)).collect();
    out.push_str(&format!(" {};\n", operands.join(separator)));
    Ok(())
}

/// Shortest representation that parses back to the same `f64`.
pub(crate) fn format_param(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcloud_ir::QubitId;
    use std::f64::consts::PI;

    #[test]
    fn test_emit_qasm2_layout() {
        let mut circuit = Circuit::new(3);
        circuit.h(QubitId(0)).unwrap();
        circuit.cnot(QubitId(0), QubitId(1)).unwrap();
        circuit.rx(0.5, QubitId(2)).unwrap();
        circuit.measure([QubitId(0), QubitId(2)]).unwrap();

        let qasm = emit_qasm2(&circuit).unwrap();
        assert_eq!(
            qasm,
            "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\ncreg register0[2];\n\
             h q[0];\ncx q[0],q[1];\nrx(0.5) q[2];\n\
             measure q[0] -> register0[0];\nmeasure q[2] -> register0[1];\n"
        );
    }

    #[test]
    fn test_emit_qasm3_measurement_assignments() {
        let mut circuit = Circuit::new(2);
        circuit.rzz(PI, QubitId(0), QubitId(1)).unwrap();
        circuit.measure_into("meas", [QubitId(1)]).unwrap();

        let qasm = emit_qasm3(&circuit).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;\ninclude \"stdgates.inc\";\nbit[1] meas;\nqubit[2] q;\n"));
        assert!(qasm.contains("rzz(3.141592653589793) q[0], q[1];\n"));
        assert!(qasm.ends_with("meas[0] = measure q[1];\n"));
    }

    #[test]
    fn test_emit_qasm3_exact_output() {
        let mut circuit = Circuit::new(2);
        circuit.rx(0.25, QubitId(1)).unwrap();
        circuit.cnot(QubitId(1), QubitId(0)).unwrap();
        circuit.measure_into("c", [QubitId(0), QubitId(1)]).unwrap();

        let qasm = emit_qasm3(&circuit).unwrap();
        assert_eq!(
            qasm,
            "OPENQASM 3.0;\ninclude \"stdgates.inc\";\nbit[2] c;\nqubit[2] q;\n\
             rx(0.25) q[1];\ncx q[1], q[0];\n\
             c[0] = measure q[0];\nc[1] = measure q[1];\n"
        );
    }

    #[test]
    fn test_unitary_is_rejected() {
        use num_complex::Complex64;
        use qcloud_ir::UnitaryMatrix;

        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let mut circuit = Circuit::new(1);
        circuit
            .unitary(UnitaryMatrix::new(vec![one, zero, zero, one]).unwrap(), [QubitId(0)])
            .unwrap();
        assert!(matches!(emit_qasm2(&circuit), Err(QasmError::Unsupported(_))));
    }

    #[test]
    fn test_params_survive_parsing() {
        let theta = PI / 7.0;
        let mut circuit = Circuit::new(1);
        circuit.rx(theta, QubitId(0)).unwrap();
        circuit.measure_all().unwrap();

        let parsed = crate::parse(&emit_qasm2(&circuit).unwrap()).unwrap();
        let (_, gate) = parsed.gates().next().unwrap();
        assert_eq!(gate.kind(), &GateKind::Rx(theta));
    }
}
