//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// The closed set of gate kinds a circuit can contain.
///
/// Angles are in radians. Parameter order follows the constructor order used
/// throughout the workspace, e.g. `MS(phi0, phi1, theta)` and `U3(theta, phi, lambda)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    // Single-qubit gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Single-qubit gate U3(θ, φ, λ).
    U3(f64, f64, f64),
    /// Trapped-ion native GPI(φ).
    GPI(f64),
    /// Trapped-ion native GPI2(φ).
    GPI2(f64),
    /// Phased RX gate PRX(θ, φ).
    PRX(f64, f64),

    // Controlled gates
    /// Controlled-X gate.
    CNOT,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled sqrt(X) gate.
    CSX,
    /// Controlled rotation around X.
    CRx(f64),
    /// Controlled rotation around Y.
    CRy(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate diag(1, 1, 1, e^{iθ}).
    CU1(f64),

    // Swap family
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Fermionic SWAP gate.
    FSwap,
    /// Echoed cross-resonance gate.
    ECR,

    // Two-qubit rotations
    /// XX rotation exp(-iθ/2 XX).
    RXX(f64),
    /// YY rotation exp(-iθ/2 YY).
    RYY(f64),
    /// ZZ rotation exp(-iθ/2 ZZ).
    RZZ(f64),
    /// XX+YY rotation exp(-iθ/4 (XX + YY)).
    RXXYY(f64),
    /// Mølmer-Sørensen gate MS(φ0, φ1, θ).
    MS(f64, f64, f64),

    /// Toffoli gate.
    Toffoli,

    /// Arbitrary unitary on one or more qubits.
    Unitary(UnitaryMatrix),
}

impl GateKind {
    /// The gate's lowercase mnemonic, as used in OpenQASM `qelib1` text.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::I => "id",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::H => "h",
            GateKind::S => "s",
            GateKind::Sdg => "sdg",
            GateKind::T => "t",
            GateKind::Tdg => "tdg",
            GateKind::SX => "sx",
            GateKind::SXdg => "sxdg",
            GateKind::Rx(_) => "rx",
            GateKind::Ry(_) => "ry",
            GateKind::Rz(_) => "rz",
            GateKind::U3(..) => "u3",
            GateKind::GPI(_) => "gpi",
            GateKind::GPI2(_) => "gpi2",
            GateKind::PRX(..) => "prx",
            GateKind::CNOT => "cx",
            GateKind::CY => "cy",
            GateKind::CZ => "cz",
            GateKind::CSX => "csx",
            GateKind::CRx(_) => "crx",
            GateKind::CRy(_) => "cry",
            GateKind::CRz(_) => "crz",
            GateKind::CU1(_) => "cu1",
            GateKind::Swap => "swap",
            GateKind::ISwap => "iswap",
            GateKind::FSwap => "fswap",
            GateKind::ECR => "ecr",
            GateKind::RXX(_) => "rxx",
            GateKind::RYY(_) => "ryy",
            GateKind::RZZ(_) => "rzz",
            GateKind::RXXYY(_) => "rxxyy",
            GateKind::MS(..) => "ms",
            GateKind::Toffoli => "ccx",
            GateKind::Unitary(_) => "unitary",
        }
    }

    /// Number of qubits the gate acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::I
            | GateKind::X
            | GateKind::Y
            | GateKind::Z
            | GateKind::H
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::SX
            | GateKind::SXdg
            | GateKind::Rx(_)
            | GateKind::Ry(_)
            | GateKind::Rz(_)
            | GateKind::U3(..)
            | GateKind::GPI(_)
            | GateKind::GPI2(_)
            | GateKind::PRX(..) => 1,

            GateKind::CNOT
            | GateKind::CY
            | GateKind::CZ
            | GateKind::CSX
            | GateKind::CRx(_)
            | GateKind::CRy(_)
            | GateKind::CRz(_)
            | GateKind::CU1(_)
            | GateKind::Swap
            | GateKind::ISwap
            | GateKind::FSwap
            | GateKind::ECR
            | GateKind::RXX(_)
            | GateKind::RYY(_)
            | GateKind::RZZ(_)
            | GateKind::RXXYY(_)
            | GateKind::MS(..) => 2,

            GateKind::Toffoli => 3,

            GateKind::Unitary(matrix) => matrix.num_qubits(),
        }
    }

    /// Real parameters of the gate, in constructor order.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            GateKind::Rx(p)
            | GateKind::Ry(p)
            | GateKind::Rz(p)
            | GateKind::GPI(p)
            | GateKind::GPI2(p)
            | GateKind::CRx(p)
            | GateKind::CRy(p)
            | GateKind::CRz(p)
            | GateKind::CU1(p)
            | GateKind::RXX(p)
            | GateKind::RYY(p)
            | GateKind::RZZ(p)
            | GateKind::RXXYY(p) => vec![*p],
            GateKind::PRX(theta, phi) => vec![*theta, *phi],
            GateKind::U3(a, b, c) | GateKind::MS(a, b, c) => vec![*a, *b, *c],
            _ => vec![],
        }
    }

    /// Whether the gate maps computational basis states to signed basis
    /// states up to phase. Only fixed Clifford gates report `true`.
    pub fn is_clifford(&self) -> bool {
        matches!(
            self,
            GateKind::I
                | GateKind::X
                | GateKind::Y
                | GateKind::Z
                | GateKind::H
                | GateKind::S
                | GateKind::Sdg
                | GateKind::SX
                | GateKind::SXdg
                | GateKind::CNOT
                | GateKind::CY
                | GateKind::CZ
                | GateKind::Swap
                | GateKind::ISwap
                | GateKind::FSwap
                | GateKind::ECR
        )
    }
}

/// A dense square matrix of dimension 2^n stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryMatrix {
    dim: usize,
    data: Vec<Complex64>,
}

impl UnitaryMatrix {
    /// Build a matrix from row-major entries.
    ///
    /// The entry count must be `4^n` for some `n >= 1`. Unitarity is not
    /// enforced here; see [`UnitaryMatrix::is_unitary`].
    pub fn new(data: Vec<Complex64>) -> IrResult<Self> {
        let dim = (data.len() as f64).sqrt().round() as usize;
        if dim * dim != data.len() {
            return Err(IrError::InvalidMatrix(format!(
                "{} entries do not form a square matrix",
                data.len()
            )));
        }
        if dim < 2 || !dim.is_power_of_two() {
            return Err(IrError::InvalidMatrix(format!(
                "dimension {dim} is not a power of two"
            )));
        }
        Ok(Self { dim, data })
    }

    /// Build a matrix from nested rows.
    pub fn from_rows(rows: Vec<Vec<Complex64>>) -> IrResult<Self> {
        let dim = rows.len();
        if rows.iter().any(|row| row.len() != dim) {
            return Err(IrError::InvalidMatrix("rows have unequal length".into()));
        }
        Self::new(rows.into_iter().flatten().collect())
    }

    /// Matrix dimension (number of rows).
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of qubits the matrix acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// Row-major entries.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Complex64]> {
        self.data.chunks(self.dim)
    }

    /// Check `U†U = I` within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        let n = self.dim;
        for i in 0..n {
            for j in 0..n {
                let mut sum = Complex64::new(0.0, 0.0);
                for k in 0..n {
                    sum += self.get(k, i).conj() * self.get(k, j);
                }
                let expected = if i == j { 1.0 } else { 0.0 };
                if (sum - Complex64::new(expected, 0.0)).norm() > tol {
                    return false;
                }
            }
        }
        true
    }
}

/// A gate applied to an ordered list of qubits.
///
/// Arity, distinct qubits and finite parameters are checked in [`Gate::new`];
/// a constructed gate is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    qubits: Vec<QubitId>,
}

impl Gate {
    /// Create a gate, validating arity and operands.
    pub fn new(kind: GateKind, qubits: impl Into<Vec<QubitId>>) -> IrResult<Self> {
        let qubits = qubits.into();
        let expected = kind.num_qubits();
        if qubits.len() != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: kind.name().to_string(),
                expected,
                got: qubits.len(),
            });
        }
        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(kind.name().to_string()),
                });
            }
        }
        if kind.parameters().iter().any(|p| !p.is_finite()) {
            return Err(IrError::NonFiniteParameter {
                gate_name: kind.name().to_string(),
            });
        }
        Ok(Self { kind, qubits })
    }

    /// The gate kind, including its parameters.
    #[inline]
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// Operand qubits in order (controls first for controlled gates).
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// The gate mnemonic.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Gate parameters in constructor order.
    pub fn parameters(&self) -> Vec<f64> {
        self.kind.parameters()
    }
}
