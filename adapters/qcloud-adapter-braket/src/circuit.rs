//! Braket circuit model and its OpenQASM 3 serialisation.

use num_complex::Complex64;

use crate::error::{BraketError, BraketResult};
use crate::gate::BraketGate;

/// A gate applied to target qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct BraketInstruction {
    gate: BraketGate,
    target: Vec<u32>,
}

impl BraketInstruction {
    /// Create an instruction, checking arity and distinct targets.
    pub fn new(gate: BraketGate, target: impl Into<Vec<u32>>) -> BraketResult<Self> {
        let target = target.into();
        if target.len() != gate.qubit_count() {
            return Err(BraketError::InvalidInstruction(format!(
                "{} acts on {} qubit(s), got {} target(s)",
                gate.name(),
                gate.qubit_count(),
                target.len()
            )));
        }
        for (i, q) in target.iter().enumerate() {
            if target[..i].contains(q) {
                return Err(BraketError::InvalidInstruction(format!(
                    "{} targets qubit {q} twice",
                    gate.name()
                )));
            }
        }
        Ok(Self { gate, target })
    }

    pub fn gate(&self) -> &BraketGate {
        &self.gate
    }

    pub fn target(&self) -> &[u32] {
        &self.target
    }
}

/// One entry of a [`BraketCircuit`].
#[derive(Debug, Clone, PartialEq)]
pub enum BraketOp {
    Gate(BraketInstruction),
    StartVerbatimBox,
    EndVerbatimBox,
    /// Measurement of a group of qubits, results in target order.
    Measure(Vec<u32>),
}

/// An ordered Braket program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BraketCircuit {
    ops: Vec<BraketOp>,
}

impl BraketCircuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_instruction(&mut self, instruction: BraketInstruction) -> &mut Self {
        self.ops.push(BraketOp::Gate(instruction));
        self
    }

    pub fn start_verbatim_box(&mut self) -> &mut Self {
        self.ops.push(BraketOp::StartVerbatimBox);
        self
    }

    pub fn end_verbatim_box(&mut self) -> &mut Self {
        self.ops.push(BraketOp::EndVerbatimBox);
        self
    }

    pub fn measure(&mut self, qubits: impl Into<Vec<u32>>) -> &mut Self {
        self.ops.push(BraketOp::Measure(qubits.into()));
        self
    }

    /// Entries in program order.
    pub fn ops(&self) -> &[BraketOp] {
        &self.ops
    }

    /// Gate instructions only, in program order.
    pub fn instructions(&self) -> impl Iterator<Item = &BraketInstruction> {
        self.ops.iter().filter_map(|op| match op {
            BraketOp::Gate(inst) => Some(inst),
            _ => None,
        })
    }

    pub fn has_verbatim_box(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, BraketOp::StartVerbatimBox))
    }

    /// One past the highest qubit index used by any entry.
    pub fn qubit_count(&self) -> u32 {
        self.ops
            .iter()
            .flat_map(|op| match op {
                BraketOp::Gate(inst) => inst.target.as_slice(),
                BraketOp::Measure(qubits) => qubits.as_slice(),
                _ => &[],
            })
            .max()
            .map_or(0, |q| q + 1)
    }

    /// Measured qubits in result column order.
    pub fn measured_qubits(&self) -> Vec<u32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                BraketOp::Measure(qubits) => Some(qubits.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Serialise to Braket OpenQASM 3.
    ///
    /// Programs containing a verbatim box address physical qubits (`$n`) and
    /// declare no qubit register.
    pub fn to_openqasm(&self) -> String {
        let physical = self.has_verbatim_box();
        let qubit = |q: u32| {
            if physical {
                format!("${q}")
            } else {
                format!("q[{q}]")
            }
        };

        let mut out = String::from("OPENQASM 3.0;\n");
        let measured = self.measured_qubits().len();
        if measured > 0 {
            out.push_str(&format!("bit[{measured}] b;\n"));
        }
        if !physical {
            out.push_str(&format!("qubit[{}] q;\n", self.qubit_count()));
        }

        let mut bit = 0;
        for op in &self.ops {
            match op {
                BraketOp::StartVerbatimBox => out.push_str("#pragma braket verbatim\nbox{\n"),
                BraketOp::EndVerbatimBox => out.push_str("}\n"),
                BraketOp::Gate(inst) => {
                    let targets: Vec<String> = inst.target.iter().map(|&q| qubit(q)).collect();
                    let targets = targets.join(", ");
                    match &inst.gate {
                        BraketGate::Unitary(m) => {
                            let rows: Vec<String> = m
                                .rows()
                                .map(|row| {
                                    let entries: Vec<String> =
                                        row.iter().map(|z| format_complex(*z)).collect();
                                    format!("[{}]", entries.join(", "))
                                })
                                .collect();
                            out.push_str(&format!(
                                "#pragma braket unitary([{}]) {targets}\n",
                                rows.join(", ")
                            ));
                        }
                        gate => {
                            let angles = gate.angles();
                            if angles.is_empty() {
                                out.push_str(&format!("{} {targets};\n", gate.ir_name()));
                            } else {
                                let angles: Vec<String> =
                                    angles.iter().map(ToString::to_string).collect();
                                out.push_str(&format!(
                                    "{}({}) {targets};\n",
                                    gate.ir_name(),
                                    angles.join(", ")
                                ));
                            }
                        }
                    }
                }
                BraketOp::Measure(qubits) => {
                    for &q in qubits {
                        out.push_str(&format!("b[{bit}] = measure {};\n", qubit(q)));
                        bit += 1;
                    }
                }
            }
        }
        out
    }
}

fn format_complex(z: Complex64) -> String {
    if z.im < 0.0 {
        format!("{}-{}im", z.re, -z.im)
    } else {
        format!("{}+{}im", z.re, z.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell() -> BraketCircuit {
        let mut circuit = BraketCircuit::new();
        circuit
            .add_instruction(BraketInstruction::new(BraketGate::H, [0]).unwrap())
            .add_instruction(BraketInstruction::new(BraketGate::CNot, [0, 1]).unwrap())
            .measure([0, 1]);
        circuit
    }

    #[test]
    fn test_instruction_arity_checked() {
        assert!(BraketInstruction::new(BraketGate::CNot, [0]).is_err());
        assert!(BraketInstruction::new(BraketGate::CNot, [1, 1]).is_err());
        assert!(BraketInstruction::new(BraketGate::Rx(0.5), [2]).is_ok());
    }

    #[test]
    fn test_qubit_count_and_measured() {
        let mut circuit = bell();
        circuit.measure([4]);
        assert_eq!(circuit.qubit_count(), 5);
        assert_eq!(circuit.measured_qubits(), vec![0, 1, 4]);
    }

    #[test]
    fn test_openqasm_plain() {
        let qasm = bell().to_openqasm();
        assert_eq!(
            qasm,
            "OPENQASM 3.0;\nbit[2] b;\nqubit[2] q;\nh q[0];\ncnot q[0], q[1];\n\
             b[0] = measure q[0];\nb[1] = measure q[1];\n"
        );
    }

    #[test]
    fn test_openqasm_verbatim_uses_physical_qubits() {
        let mut circuit = BraketCircuit::new();
        circuit
            .start_verbatim_box()
            .add_instruction(BraketInstruction::new(BraketGate::Rx(0.5), [1]).unwrap())
            .end_verbatim_box()
            .measure([1]);
        let qasm = circuit.to_openqasm();
        assert!(!qasm.contains("qubit["));
        assert!(qasm.contains("#pragma braket verbatim\nbox{\nrx(0.5) $1;\n}\n"));
        assert!(qasm.ends_with("b[0] = measure $1;\n"));
    }

    #[test]
    fn test_format_complex() {
        assert_eq!(format_complex(Complex64::new(0.5, -0.25)), "0.5-0.25im");
        assert_eq!(format_complex(Complex64::new(1.0, 0.0)), "1+0im");
    }
}
