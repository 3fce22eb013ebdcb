//! Reference gate matrices.
//!
//! Matrices act on the gate's qubit list with the first listed qubit as the
//! most significant bit of the row/column index, so `CNOT(c, t)` is the
//! textbook `[[1,0,0,0],[0,1,0,0],[0,0,0,1],[0,0,1,0]]`.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use ndarray::{Array2, array};
use num_complex::Complex64;

use qcloud_ir::GateKind;

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

#[inline]
fn phase(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Embed a single-qubit matrix as the target block of a controlled gate.
pub fn controlled(target: &Array2<Complex64>) -> Array2<Complex64> {
    let n = target.nrows();
    let mut m = Array2::<Complex64>::eye(2 * n);
    for r in 0..n {
        for col in 0..n {
            m[[n + r, n + col]] = target[[r, col]];
        }
    }
    m
}

/// Diagonal matrix from its entries.
pub fn diagonal(entries: &[Complex64]) -> Array2<Complex64> {
    let mut m = Array2::<Complex64>::zeros((entries.len(), entries.len()));
    for (i, e) in entries.iter().enumerate() {
        m[[i, i]] = *e;
    }
    m
}

pub fn pauli_x() -> Array2<Complex64> {
    array![[ZERO, ONE], [ONE, ZERO]]
}

pub fn pauli_y() -> Array2<Complex64> {
    array![[ZERO, -I], [I, ZERO]]
}

pub fn pauli_z() -> Array2<Complex64> {
    diagonal(&[ONE, -ONE])
}

pub fn sqrt_x() -> Array2<Complex64> {
    array![[c(0.5, 0.5), c(0.5, -0.5)], [c(0.5, -0.5), c(0.5, 0.5)]]
}

pub fn rx(theta: f64) -> Array2<Complex64> {
    let (s, co) = (theta / 2.0).sin_cos();
    array![[c(co, 0.0), c(0.0, -s)], [c(0.0, -s), c(co, 0.0)]]
}

pub fn ry(theta: f64) -> Array2<Complex64> {
    let (s, co) = (theta / 2.0).sin_cos();
    array![[c(co, 0.0), c(-s, 0.0)], [c(s, 0.0), c(co, 0.0)]]
}

pub fn rz(theta: f64) -> Array2<Complex64> {
    diagonal(&[phase(-theta / 2.0), phase(theta / 2.0)])
}

/// `U3(θ, φ, λ) = e^{-i(φ+λ)/2} [[cos, -e^{iλ} sin], [e^{iφ} sin, e^{i(φ+λ)} cos]]`.
pub fn u3(theta: f64, phi: f64, lambda: f64) -> Array2<Complex64> {
    let (s, co) = (theta / 2.0).sin_cos();
    let global = phase(-(phi + lambda) / 2.0);
    array![
        [global * co, -global * phase(lambda) * s],
        [global * phase(phi) * s, global * phase(phi + lambda) * co]
    ]
}

pub fn gpi(phi: f64) -> Array2<Complex64> {
    array![[ZERO, phase(-phi)], [phase(phi), ZERO]]
}

pub fn gpi2(phi: f64) -> Array2<Complex64> {
    let k = FRAC_1_SQRT_2;
    array![
        [c(k, 0.0), -I * phase(-phi) * k],
        [-I * phase(phi) * k, c(k, 0.0)]
    ]
}

pub fn prx(theta: f64, phi: f64) -> Array2<Complex64> {
    let (s, co) = (theta / 2.0).sin_cos();
    array![
        [c(co, 0.0), -I * phase(-phi) * s],
        [-I * phase(phi) * s, c(co, 0.0)]
    ]
}

pub fn ms(phi0: f64, phi1: f64, theta: f64) -> Array2<Complex64> {
    let (s, co) = (theta / 2.0).sin_cos();
    let co = c(co, 0.0);
    let sum = -I * phase(phi0 + phi1) * s;
    let diff = -I * phase(phi0 - phi1) * s;
    let sum_c = -I * phase(-(phi0 + phi1)) * s;
    let diff_c = -I * phase(-(phi0 - phi1)) * s;
    array![
        [co, ZERO, ZERO, sum_c],
        [ZERO, co, diff_c, ZERO],
        [ZERO, diff, co, ZERO],
        [sum, ZERO, ZERO, co]
    ]
}

/// The matrix of a gate kind.
pub fn matrix(kind: &GateKind) -> Array2<Complex64> {
    match kind {
        GateKind::I => Array2::eye(2),
        GateKind::X => pauli_x(),
        GateKind::Y => pauli_y(),
        GateKind::Z => pauli_z(),
        GateKind::H => array![[ONE, ONE], [ONE, -ONE]].mapv(|z| z * FRAC_1_SQRT_2),
        GateKind::S => diagonal(&[ONE, I]),
        GateKind::Sdg => diagonal(&[ONE, -I]),
        GateKind::T => diagonal(&[ONE, phase(PI / 4.0)]),
        GateKind::Tdg => diagonal(&[ONE, phase(-PI / 4.0)]),
        GateKind::SX => sqrt_x(),
        GateKind::SXdg => sqrt_x().mapv(|z| z.conj()),
        GateKind::Rx(theta) => rx(*theta),
        GateKind::Ry(theta) => ry(*theta),
        GateKind::Rz(theta) => rz(*theta),
        GateKind::U3(theta, phi, lambda) => u3(*theta, *phi, *lambda),
        GateKind::GPI(phi) => gpi(*phi),
        GateKind::GPI2(phi) => gpi2(*phi),
        GateKind::PRX(theta, phi) => prx(*theta, *phi),

        GateKind::CNOT => controlled(&pauli_x()),
        GateKind::CY => controlled(&pauli_y()),
        GateKind::CZ => controlled(&pauli_z()),
        GateKind::CSX => controlled(&sqrt_x()),
        GateKind::CRx(theta) => controlled(&rx(*theta)),
        GateKind::CRy(theta) => controlled(&ry(*theta)),
        GateKind::CRz(theta) => controlled(&rz(*theta)),
        GateKind::CU1(theta) => diagonal(&[ONE, ONE, ONE, phase(*theta)]),

        GateKind::Swap => array![
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ZERO, ONE, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, ZERO, ONE]
        ],
        GateKind::ISwap => array![
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ZERO, I, ZERO],
            [ZERO, I, ZERO, ZERO],
            [ZERO, ZERO, ZERO, ONE]
        ],
        GateKind::FSwap => array![
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ZERO, ONE, ZERO],
            [ZERO, ONE, ZERO, ZERO],
            [ZERO, ZERO, ZERO, -ONE]
        ],
        GateKind::ECR => array![
            [ZERO, ZERO, ONE, I],
            [ZERO, ZERO, I, ONE],
            [ONE, -I, ZERO, ZERO],
            [-I, ONE, ZERO, ZERO]
        ]
        .mapv(|z| z * FRAC_1_SQRT_2),

        GateKind::RXX(theta) => {
            let (s, co) = (theta / 2.0).sin_cos();
            let (co, ms) = (c(co, 0.0), c(0.0, -s));
            array![
                [co, ZERO, ZERO, ms],
                [ZERO, co, ms, ZERO],
                [ZERO, ms, co, ZERO],
                [ms, ZERO, ZERO, co]
            ]
        }
        GateKind::RYY(theta) => {
            let (s, co) = (theta / 2.0).sin_cos();
            let (co, ps, ms) = (c(co, 0.0), c(0.0, s), c(0.0, -s));
            array![
                [co, ZERO, ZERO, ps],
                [ZERO, co, ms, ZERO],
                [ZERO, ms, co, ZERO],
                [ps, ZERO, ZERO, co]
            ]
        }
        GateKind::RZZ(theta) => {
            let (a, b) = (phase(-theta / 2.0), phase(theta / 2.0));
            diagonal(&[a, b, b, a])
        }
        // exp(-iθ/4 (XX + YY)) only mixes |01> and |10>.
        GateKind::RXXYY(theta) => {
            let (s, co) = (theta / 2.0).sin_cos();
            let (co, ms) = (c(co, 0.0), c(0.0, -s));
            array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, co, ms, ZERO],
                [ZERO, ms, co, ZERO],
                [ZERO, ZERO, ZERO, ONE]
            ]
        }
        GateKind::MS(phi0, phi1, theta) => ms(*phi0, *phi1, *theta),

        GateKind::Toffoli => {
            let mut m = Array2::<Complex64>::eye(8);
            m[[6, 6]] = ZERO;
            m[[7, 7]] = ZERO;
            m[[6, 7]] = ONE;
            m[[7, 6]] = ONE;
            m
        }

        GateKind::Unitary(u) => {
            let dim = u.dim();
            Array2::from_shape_fn((dim, dim), |(r, col)| u.get(r, col))
        }
    }
}

/// `true` when `b = e^{iα} a` for some real `α`, entry-wise within `tol`.
pub fn equal_up_to_global_phase(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    let Some((pivot, _)) = a
        .indexed_iter()
        .max_by(|(_, x), (_, y)| x.norm().total_cmp(&y.norm()))
    else {
        return true;
    };
    let anchor = a[pivot];
    if anchor.norm() < tol {
        return b.iter().all(|z| z.norm() < tol);
    }
    let ratio = b[pivot] / anchor;
    if (ratio.norm() - 1.0).abs() > tol {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x * ratio - y).norm() < tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn is_unitary(m: &Array2<Complex64>) -> bool {
        let adjoint = m.t().mapv(|z| z.conj());
        let product = adjoint.dot(m);
        equal_up_to_global_phase(&product, &Array2::eye(m.nrows()), TOL)
            && (product[[0, 0]] - ONE).norm() < TOL
    }

    #[test]
    fn test_every_fixed_gate_is_unitary() {
        let kinds = [
            GateKind::I,
            GateKind::H,
            GateKind::SX,
            GateKind::SXdg,
            GateKind::U3(0.3, 1.1, -0.4),
            GateKind::GPI(0.7),
            GateKind::GPI2(0.7),
            GateKind::PRX(0.5, 0.2),
            GateKind::CSX,
            GateKind::CRy(0.9),
            GateKind::ECR,
            GateKind::FSwap,
            GateKind::RYY(1.3),
            GateKind::RXXYY(0.8),
            GateKind::MS(0.1, 0.2, 0.3),
            GateKind::Toffoli,
        ];
        for kind in &kinds {
            assert!(is_unitary(&matrix(kind)), "{} is not unitary", kind.name());
        }
    }

    #[test]
    fn test_sx_squares_to_x() {
        let sx = sqrt_x();
        assert!(equal_up_to_global_phase(&sx.dot(&sx), &pauli_x(), TOL));
    }

    #[test]
    fn test_u3_matches_rotations() {
        let theta = 0.37;
        assert!(equal_up_to_global_phase(&u3(theta, 0.0, 0.0), &ry(theta), TOL));
        assert!(equal_up_to_global_phase(
            &u3(theta, -PI / 2.0, PI / 2.0),
            &rx(theta),
            TOL
        ));
    }

    #[test]
    fn test_prx_is_conjugated_rx() {
        let (theta, phi) = (0.8, 0.35);
        let expected = rz(phi).dot(&rx(theta)).dot(&rz(-phi));
        assert!(equal_up_to_global_phase(&prx(theta, phi), &expected, TOL));
    }

    #[test]
    fn test_global_phase_detection() {
        let x = pauli_x();
        let shifted = x.mapv(|z| z * phase(0.9));
        assert!(equal_up_to_global_phase(&x, &shifted, TOL));
        assert!(!equal_up_to_global_phase(&x, &pauli_z(), TOL));
        assert!(!equal_up_to_global_phase(&x, &x.mapv(|z| z * 2.0), TOL));
    }
}
