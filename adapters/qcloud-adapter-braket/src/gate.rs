//! Braket gate set.
//!
//! Matrices follow the Braket definitions, first target as the most
//! significant bit.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use ndarray::{Array2, array};
use num_complex::Complex64;

use qcloud_adapter_sim::gates::{controlled, diagonal, pauli_x, pauli_y, pauli_z};
use qcloud_ir::UnitaryMatrix;

use crate::error::{BraketError, BraketResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

#[inline]
fn phase(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

/// A Braket gate with its angles.
#[derive(Debug, Clone, PartialEq)]
pub enum BraketGate {
    I,
    H,
    X,
    Y,
    Z,
    S,
    Si,
    T,
    Ti,
    V,
    Vi,
    CNot,
    CY,
    CZ,
    CV,
    Swap,
    ISwap,
    ECR,
    CCNot,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    XX(f64),
    YY(f64),
    ZZ(f64),
    XY(f64),
    GPi(f64),
    GPi2(f64),
    /// `PRx(θ, φ)`
    PRx(f64, f64),
    /// `MS(φ0, φ1, θ)`
    MS(f64, f64, f64),
    /// `U(θ, φ, λ)`
    U(f64, f64, f64),
    Unitary(UnitaryMatrix),
}

impl BraketGate {
    /// Braket SDK class name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::H => "H",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::S => "S",
            Self::Si => "Si",
            Self::T => "T",
            Self::Ti => "Ti",
            Self::V => "V",
            Self::Vi => "Vi",
            Self::CNot => "CNot",
            Self::CY => "CY",
            Self::CZ => "CZ",
            Self::CV => "CV",
            Self::Swap => "Swap",
            Self::ISwap => "ISwap",
            Self::ECR => "ECR",
            Self::CCNot => "CCNot",
            Self::Rx(_) => "Rx",
            Self::Ry(_) => "Ry",
            Self::Rz(_) => "Rz",
            Self::XX(_) => "XX",
            Self::YY(_) => "YY",
            Self::ZZ(_) => "ZZ",
            Self::XY(_) => "XY",
            Self::GPi(_) => "GPi",
            Self::GPi2(_) => "GPi2",
            Self::PRx(..) => "PRx",
            Self::MS(..) => "MS",
            Self::U(..) => "U",
            Self::Unitary(_) => "Unitary",
        }
    }

    /// Gate name in Braket OpenQASM.
    pub fn ir_name(&self) -> &'static str {
        match self {
            Self::U(..) => "U",
            Self::Unitary(_) => "unitary",
            Self::CNot => "cnot",
            Self::CCNot => "ccnot",
            Self::ISwap => "iswap",
            Self::GPi(_) => "gpi",
            Self::GPi2(_) => "gpi2",
            Self::PRx(..) => "prx",
            Self::Si => "si",
            Self::Ti => "ti",
            Self::Vi => "vi",
            Self::I => "i",
            Self::H => "h",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::S => "s",
            Self::T => "t",
            Self::V => "v",
            Self::CY => "cy",
            Self::CZ => "cz",
            Self::CV => "cv",
            Self::Swap => "swap",
            Self::ECR => "ecr",
            Self::Rx(_) => "rx",
            Self::Ry(_) => "ry",
            Self::Rz(_) => "rz",
            Self::XX(_) => "xx",
            Self::YY(_) => "yy",
            Self::ZZ(_) => "zz",
            Self::XY(_) => "xy",
            Self::MS(..) => "ms",
        }
    }

    /// Build a gate from its OpenQASM name and evaluated angles.
    pub fn from_ir(name: &str, angles: &[f64]) -> BraketResult<Self> {
        let expect = |n: usize| -> BraketResult<()> {
            if angles.len() == n {
                Ok(())
            } else {
                Err(BraketError::InvalidInstruction(format!(
                    "'{name}' takes {n} angle(s), got {}",
                    angles.len()
                )))
            }
        };
        let fixed = match name {
            "i" => Some(Self::I),
            "h" => Some(Self::H),
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            "s" => Some(Self::S),
            "si" => Some(Self::Si),
            "t" => Some(Self::T),
            "ti" => Some(Self::Ti),
            "v" => Some(Self::V),
            "vi" => Some(Self::Vi),
            "cnot" => Some(Self::CNot),
            "cy" => Some(Self::CY),
            "cz" => Some(Self::CZ),
            "cv" => Some(Self::CV),
            "swap" => Some(Self::Swap),
            "iswap" => Some(Self::ISwap),
            "ecr" => Some(Self::ECR),
            "ccnot" => Some(Self::CCNot),
            _ => None,
        };
        if let Some(gate) = fixed {
            expect(0)?;
            return Ok(gate);
        }

        let one: Option<fn(f64) -> Self> = match name {
            "rx" => Some(Self::Rx),
            "ry" => Some(Self::Ry),
            "rz" => Some(Self::Rz),
            "xx" => Some(Self::XX),
            "yy" => Some(Self::YY),
            "zz" => Some(Self::ZZ),
            "xy" => Some(Self::XY),
            "gpi" => Some(Self::GPi),
            "gpi2" => Some(Self::GPi2),
            _ => None,
        };
        if let Some(ctor) = one {
            expect(1)?;
            return Ok(ctor(angles[0]));
        }

        match name {
            "prx" => {
                expect(2)?;
                Ok(Self::PRx(angles[0], angles[1]))
            }
            "ms" => {
                expect(3)?;
                Ok(Self::MS(angles[0], angles[1], angles[2]))
            }
            "U" => {
                expect(3)?;
                Ok(Self::U(angles[0], angles[1], angles[2]))
            }
            other => Err(BraketError::UnknownGate(other.to_string())),
        }
    }

    /// Number of target qubits.
    pub fn qubit_count(&self) -> usize {
        match self {
            Self::CNot
            | Self::CY
            | Self::CZ
            | Self::CV
            | Self::Swap
            | Self::ISwap
            | Self::ECR
            | Self::XX(_)
            | Self::YY(_)
            | Self::ZZ(_)
            | Self::XY(_)
            | Self::MS(..) => 2,
            Self::CCNot => 3,
            Self::Unitary(m) => m.num_qubits(),
            _ => 1,
        }
    }

    /// Angles in constructor order.
    pub fn angles(&self) -> Vec<f64> {
        match self {
            Self::Rx(a)
            | Self::Ry(a)
            | Self::Rz(a)
            | Self::XX(a)
            | Self::YY(a)
            | Self::ZZ(a)
            | Self::XY(a)
            | Self::GPi(a)
            | Self::GPi2(a) => vec![*a],
            Self::PRx(a, b) => vec![*a, *b],
            Self::MS(a, b, c) | Self::U(a, b, c) => vec![*a, *b, *c],
            _ => Vec::new(),
        }
    }

    /// The gate's matrix.
    pub fn matrix(&self) -> Array2<Complex64> {
        let v = array![
            [Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5)],
            [Complex64::new(0.5, -0.5), Complex64::new(0.5, 0.5)]
        ];
        match self {
            Self::I => Array2::eye(2),
            Self::H => array![[ONE, ONE], [ONE, -ONE]].mapv(|z| z * FRAC_1_SQRT_2),
            Self::X => pauli_x(),
            Self::Y => pauli_y(),
            Self::Z => pauli_z(),
            Self::S => diagonal(&[ONE, I]),
            Self::Si => diagonal(&[ONE, -I]),
            Self::T => diagonal(&[ONE, phase(PI / 4.0)]),
            Self::Ti => diagonal(&[ONE, phase(-PI / 4.0)]),
            Self::V => v,
            Self::Vi => v.t().mapv(|z| z.conj()),
            Self::CNot => controlled(&pauli_x()),
            Self::CY => controlled(&pauli_y()),
            Self::CZ => controlled(&pauli_z()),
            Self::CV => controlled(&v),
            Self::Swap => array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE]
            ],
            Self::ISwap => array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, I, ZERO],
                [ZERO, I, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE]
            ],
            Self::ECR => array![
                [ZERO, ZERO, ONE, I],
                [ZERO, ZERO, I, ONE],
                [ONE, -I, ZERO, ZERO],
                [-I, ONE, ZERO, ZERO]
            ]
            .mapv(|z| z * FRAC_1_SQRT_2),
            Self::CCNot => controlled(&controlled(&pauli_x())),
            Self::Rx(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                array![[c * ONE, -I * s], [-I * s, c * ONE]]
            }
            Self::Ry(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                array![[c * ONE, -s * ONE], [s * ONE, c * ONE]]
            }
            Self::Rz(theta) => diagonal(&[phase(-theta / 2.0), phase(theta / 2.0)]),
            Self::XX(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                let (c, m) = (c * ONE, -I * s);
                array![
                    [c, ZERO, ZERO, m],
                    [ZERO, c, m, ZERO],
                    [ZERO, m, c, ZERO],
                    [m, ZERO, ZERO, c]
                ]
            }
            Self::YY(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                let (c, p, m) = (c * ONE, I * s, -I * s);
                array![
                    [c, ZERO, ZERO, p],
                    [ZERO, c, m, ZERO],
                    [ZERO, m, c, ZERO],
                    [p, ZERO, ZERO, c]
                ]
            }
            Self::ZZ(theta) => {
                let (a, b) = (phase(-theta / 2.0), phase(theta / 2.0));
                diagonal(&[a, b, b, a])
            }
            Self::XY(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                let (c, p) = (c * ONE, I * s);
                array![
                    [ONE, ZERO, ZERO, ZERO],
                    [ZERO, c, p, ZERO],
                    [ZERO, p, c, ZERO],
                    [ZERO, ZERO, ZERO, ONE]
                ]
            }
            Self::GPi(phi) => array![[ZERO, phase(-phi)], [phase(*phi), ZERO]],
            Self::GPi2(phi) => array![
                [ONE, -I * phase(-phi)],
                [-I * phase(*phi), ONE]
            ]
            .mapv(|z| z * FRAC_1_SQRT_2),
            Self::PRx(theta, phi) => {
                let (s, c) = (theta / 2.0).sin_cos();
                array![
                    [c * ONE, -I * phase(-phi) * s],
                    [-I * phase(*phi) * s, c * ONE]
                ]
            }
            Self::MS(phi0, phi1, theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                let c = c * ONE;
                let (sum, diff) = (phi0 + phi1, phi0 - phi1);
                array![
                    [c, ZERO, ZERO, -I * phase(-sum) * s],
                    [ZERO, c, -I * phase(-diff) * s, ZERO],
                    [ZERO, -I * phase(diff) * s, c, ZERO],
                    [-I * phase(sum) * s, ZERO, ZERO, c]
                ]
            }
            Self::U(theta, phi, lambda) => {
                let (s, c) = (theta / 2.0).sin_cos();
                array![
                    [c * ONE, -phase(*lambda) * s],
                    [phase(*phi) * s, phase(phi + lambda) * c]
                ]
            }
            Self::Unitary(m) => {
                let dim = m.dim();
                Array2::from_shape_fn((dim, dim), |(r, c)| m.get(r, c))
            }
        }
    }
}

impl std::fmt::Display for BraketGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let angles = self.angles();
        if angles.is_empty() {
            write!(f, "{}", self.name())
        } else {
            let joined: Vec<String> = angles.iter().map(ToString::to_string).collect();
            write!(f, "{}({})", self.name(), joined.join(", "))
        }
    }
}
