//! Abstract syntax tree for parsed OpenQASM programs.

use serde::{Deserialize, Serialize};

use crate::error::{QasmError, QasmResult};

/// A parsed program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Version string from the `OPENQASM` header.
    pub version: String,
    /// Included file names, in order.
    pub includes: Vec<String>,
    /// Top-level statements.
    pub statements: Vec<Statement>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `qreg q[n];` or `qubit[n] q;`
    QubitDecl { name: String, size: u32 },
    /// `creg c[n];` or `bit[n] c;`
    ClassicalDecl { name: String, size: u32 },
    /// Gate application.
    Gate(GateCall),
    /// `measure q[0] -> c[0];` or `c[0] = measure q[0];`
    Measure {
        qubit: QubitRef,
        target: Option<BitRef>,
    },
    /// `barrier q[0], q[1];`
    Barrier(Vec<QubitRef>),
    /// `#pragma braket verbatim` followed by `box { ... }`.
    Verbatim(Vec<Statement>),
    /// Any other pragma, kept as text.
    Pragma(String),
}

/// A gate call such as `rx(pi/2) q[0];`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub qubits: Vec<QubitRef>,
}

/// A qubit operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QubitRef {
    /// `q[3]`
    Indexed { register: String, index: u32 },
    /// `q`, only valid for single-qubit registers.
    Named(String),
    /// `$3`
    Physical(u32),
}

/// A classical bit target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitRef {
    pub register: String,
    pub index: Option<u32>,
}

/// A parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Int(i64),
    Float(f64),
    Pi,
    Tau,
    Neg(Box<Expression>),
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    Paren(Box<Expression>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Expression {
    /// Evaluate to a real number.
    #[allow(clippy::cast_precision_loss)]
    pub fn eval(&self) -> f64 {
        match self {
            Expression::Int(v) => *v as f64,
            Expression::Float(v) => *v,
            Expression::Pi => std::f64::consts::PI,
            Expression::Tau => std::f64::consts::TAU,
            Expression::Neg(inner) => -inner.eval(),
            Expression::Paren(inner) => inner.eval(),
            Expression::BinOp { left, op, right } => {
                let (l, r) = (left.eval(), right.eval());
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                }
            }
        }
    }
}

impl Program {
    /// Statements in execution order with verbatim boxes inlined.
    pub fn operations(&self) -> Vec<&Statement> {
        fn walk<'a>(statements: &'a [Statement], out: &mut Vec<&'a Statement>) {
            for statement in statements {
                match statement {
                    Statement::Verbatim(inner) => walk(inner, out),
                    other => out.push(other),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.statements, &mut out);
        out
    }

    /// Returns `true` when the program contains a verbatim box.
    pub fn has_verbatim(&self) -> bool {
        self.statements
            .iter()
            .any(|s| matches!(s, Statement::Verbatim(_)))
    }

    /// Number of qubits: the declared total, or one past the highest
    /// physical qubit when the program addresses `$n` directly.
    ///
    /// Fails when the total does not fit in a `u32`.
    pub fn num_qubits(&self) -> QasmResult<u32> {
        let declared = self
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::QubitDecl { size, .. } => Some(*size),
                _ => None,
            })
            .try_fold(0u32, u32::checked_add)
            .ok_or_else(too_many_qubits)?;
        let physical = self
            .operations()
            .into_iter()
            .flat_map(statement_qubits)
            .filter_map(|q| match q {
                QubitRef::Physical(n) => Some(n.checked_add(1).ok_or_else(too_many_qubits)),
                _ => None,
            })
            .try_fold(0u32, |max, n| n.map(|n| max.max(n)))?;
        Ok(declared.max(physical))
    }

    /// Resolve an operand to a flat qubit index. Registers are laid out in
    /// declaration order.
    pub fn resolve_qubit(&self, qubit: &QubitRef) -> QasmResult<u32> {
        let (register, index) = match qubit {
            QubitRef::Physical(n) => return Ok(*n),
            QubitRef::Indexed { register, index } => (register, Some(*index)),
            QubitRef::Named(register) => (register, None),
        };

        let mut offset = 0u32;
        for statement in &self.statements {
            if let Statement::QubitDecl { name, size } = statement {
                if name == register {
                    let index = match index {
                        Some(i) => i,
                        None if *size == 1 => 0,
                        None => {
                            return Err(QasmError::Unsupported(format!(
                                "register broadcast over '{register}'"
                            )));
                        }
                    };
                    if index >= *size {
                        return Err(QasmError::IndexOutOfBounds {
                            register: register.clone(),
                            index,
                            size: *size,
                        });
                    }
                    return offset.checked_add(index).ok_or_else(too_many_qubits);
                }
                offset = offset.checked_add(*size).ok_or_else(too_many_qubits)?;
            }
        }
        Err(QasmError::UndefinedRegister(register.clone()))
    }

    /// Measured qubits grouped by classical register, in order of first
    /// appearance; within a register, ordered by bit index. Untargeted
    /// measurements form one group keyed by an empty name.
    pub fn measurement_groups(&self) -> QasmResult<Vec<(String, Vec<u32>)>> {
        let mut groups: Vec<(String, Vec<(u32, u32)>)> = Vec::new();
        for statement in self.operations() {
            let Statement::Measure { qubit, target } = statement else {
                continue;
            };
            let qubit = self.resolve_qubit(qubit)?;
            let (name, bit) = match target {
                Some(BitRef { register, index }) => (register.clone(), index.unwrap_or(0)),
                None => (String::new(), u32::MAX),
            };
            match groups.iter_mut().find(|(n, _)| *n == name) {
                Some((_, members)) => members.push((bit, qubit)),
                None => groups.push((name, vec![(bit, qubit)])),
            }
        }
        Ok(groups
            .into_iter()
            .map(|(name, mut members)| {
                members.sort_by_key(|(bit, _)| *bit);
                (name, members.into_iter().map(|(_, q)| q).collect())
            })
            .collect())
    }
}

fn statement_qubits(statement: &Statement) -> Vec<QubitRef> {
    match statement {
        Statement::Gate(call) => call.qubits.clone(),
        Statement::Measure { qubit, .. } => vec![qubit.clone()],
        Statement::Barrier(qubits) => qubits.clone(),
        _ => Vec::new(),
    }
}

fn too_many_qubits() -> QasmError {
    QasmError::Unsupported("more than 2^32 - 1 qubits".to_string())
}
