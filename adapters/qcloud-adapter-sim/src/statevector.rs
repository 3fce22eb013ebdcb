//! Statevector simulation engine.
//!
//! Amplitude index bit `q` holds the state of qubit `q` (little-endian).

use std::f64::consts::PI;

use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;

use qcloud_ir::GateKind;

use crate::gates;

/// A pure state of `num_qubits` qubits.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply a gate to the given qubits (in the gate's operand order).
    ///
    /// Common gates use dedicated bitmask loops; everything else goes
    /// through [`Statevector::apply_unitary`] with the reference matrix.
    pub fn apply_gate(&mut self, gate: &GateKind, qubits: &[usize]) {
        match gate {
            GateKind::I => {}
            GateKind::X => self.apply_x(qubits[0]),
            GateKind::Y => self.apply_y(qubits[0]),
            GateKind::Z => self.apply_phase(qubits[0], PI),
            GateKind::H => self.apply_h(qubits[0]),
            GateKind::S => self.apply_phase(qubits[0], PI / 2.0),
            GateKind::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            GateKind::T => self.apply_phase(qubits[0], PI / 4.0),
            GateKind::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            GateKind::Rx(theta) => self.apply_rx(qubits[0], *theta),
            GateKind::Ry(theta) => self.apply_ry(qubits[0], *theta),
            GateKind::Rz(theta) => self.apply_rz(qubits[0], *theta),
            GateKind::CNOT => self.apply_cx(qubits[0], qubits[1]),
            GateKind::CZ => self.apply_cp(qubits[0], qubits[1], PI),
            GateKind::CU1(theta) => self.apply_cp(qubits[0], qubits[1], *theta),
            GateKind::Swap => self.apply_swap(qubits[0], qubits[1]),
            GateKind::Toffoli => self.apply_ccx(qubits[0], qubits[1], qubits[2]),
            other => self.apply_unitary(qubits, &gates::matrix(other)),
        }
    }

    /// Apply a `2^k × 2^k` matrix to `targets`; `targets[0]` is the most
    /// significant bit of the matrix index.
    pub fn apply_unitary(&mut self, targets: &[usize], matrix: &Array2<Complex64>) {
        let k = targets.len();
        let dim = 1usize << k;
        debug_assert_eq!(matrix.dim(), (dim, dim));

        let target_mask = targets.iter().fold(0usize, |m, &q| m | (1 << q));
        let offsets: Vec<usize> = (0..dim)
            .map(|sub| {
                targets
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| sub & (1 << (k - 1 - j)) != 0)
                    .fold(0usize, |acc, (_, &q)| acc | (1 << q))
            })
            .collect();

        let mut local = vec![Complex64::new(0.0, 0.0); dim];
        for base in 0..self.amplitudes.len() {
            if base & target_mask != 0 {
                continue;
            }
            for (slot, offset) in local.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, offset) in offsets.iter().enumerate() {
                let mut acc = Complex64::new(0.0, 0.0);
                for (col, amp) in local.iter().enumerate() {
                    acc += matrix[[row, col]] * amp;
                }
                self.amplitudes[base | offset] = acc;
            }
        }
    }

    /// Apply one randomly chosen Kraus operator to `qubit`, weighted by
    /// `‖K ψ‖²`, and renormalise.
    pub fn apply_kraus<R: Rng + ?Sized>(
        &mut self,
        qubit: usize,
        operators: &[Array2<Complex64>],
        rng: &mut R,
    ) {
        let r: f64 = rng.r#gen();
        let mut cumulative = 0.0;
        let mut chosen = None;
        for op in operators {
            let mut branch = self.clone();
            branch.apply_unitary(&[qubit], op);
            let weight = branch.norm_sqr();
            cumulative += weight;
            if weight > 0.0 {
                chosen = Some((branch, weight));
            }
            if r < cumulative {
                break;
            }
        }
        if let Some((branch, weight)) = chosen {
            *self = branch;
            let norm = weight.sqrt();
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Marginal distribution over `qubits`, big-endian in list order.
    pub fn marginal(&self, qubits: &[usize]) -> Vec<f64> {
        let mut out = vec![0.0; 1 << qubits.len()];
        for (index, amp) in self.amplitudes.iter().enumerate() {
            let key = qubits
                .iter()
                .fold(0usize, |acc, &q| (acc << 1) | ((index >> q) & 1));
            out[key] += amp.norm_sqr();
        }
        out
    }

    /// Draw `shots` basis-state indices.
    pub fn sample<R: Rng + ?Sized>(&self, shots: usize, rng: &mut R) -> Vec<usize> {
        let mut cumulative = Vec::with_capacity(self.amplitudes.len());
        let mut total = 0.0;
        for amp in &self.amplitudes {
            total += amp.norm_sqr();
            cumulative.push(total);
        }
        let last = self.amplitudes.len() - 1;
        (0..shots)
            .map(|_| {
                let r = rng.r#gen::<f64>() * total;
                let mut index = cumulative.partition_point(|&c| c <= r).min(last);
                // Never return a zero-probability state after a rounding miss.
                while index > 0 && self.amplitudes[index].norm_sqr() == 0.0 {
                    index -= 1;
                }
                index
            })
            .collect()
    }

    // =========================================================================
    // Bitmask fast paths
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let (s, c) = (theta / 2.0).sin_cos();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let (s, c) = (theta / 2.0).sin_cos();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let mask = (1 << control) | (1 << target);
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp *= phase;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let ctrl_mask = (1 << c1) | (1 << c2);
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn states_match(a: &Statevector, b: &Statevector) -> bool {
        a.amplitudes()
            .iter()
            .zip(b.amplitudes())
            .all(|(x, y)| approx_eq(*x, *y))
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(sv.amplitudes[1..].iter().all(|a| approx_eq(*a, Complex64::new(0.0, 0.0))));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(&GateKind::H, &[0]);
        sv.apply_gate(&GateKind::CNOT, &[0, 1]);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_fast_paths_agree_with_matrices() {
        let cases: Vec<(GateKind, Vec<usize>)> = vec![
            (GateKind::X, vec![1]),
            (GateKind::Y, vec![0]),
            (GateKind::Z, vec![2]),
            (GateKind::H, vec![1]),
            (GateKind::S, vec![0]),
            (GateKind::Tdg, vec![2]),
            (GateKind::Rx(0.4), vec![1]),
            (GateKind::Ry(-1.2), vec![0]),
            (GateKind::Rz(0.9), vec![2]),
            (GateKind::CNOT, vec![2, 0]),
            (GateKind::CZ, vec![0, 1]),
            (GateKind::CU1(0.6), vec![1, 2]),
            (GateKind::Swap, vec![0, 2]),
            (GateKind::Toffoli, vec![2, 0, 1]),
        ];

        for (kind, qubits) in cases {
            let mut prepared = Statevector::new(3);
            prepared.apply_unitary(&[0], &gates::u3(0.3, 0.2, 0.1));
            prepared.apply_unitary(&[1], &gates::u3(1.1, -0.5, 0.8));
            prepared.apply_unitary(&[2], &gates::u3(2.0, 0.7, -0.3));

            let mut fast = prepared.clone();
            fast.apply_gate(&kind, &qubits);
            let mut generic = prepared;
            generic.apply_unitary(&qubits, &gates::matrix(&kind));
            assert!(states_match(&fast, &generic), "{} disagrees", kind.name());
        }
    }

    #[test]
    fn test_apply_unitary_operand_order() {
        // CNOT with control on qubit 1 flips qubit 0.
        let mut sv = Statevector::new(2);
        sv.apply_gate(&GateKind::X, &[1]);
        sv.apply_unitary(&[1, 0], &gates::matrix(&GateKind::CNOT));
        assert!(approx_eq(sv.amplitudes[0b11], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_marginal_is_big_endian() {
        let mut sv = Statevector::new(3);
        sv.apply_gate(&GateKind::X, &[0]);
        assert_eq!(sv.marginal(&[0, 2]), vec![0.0, 0.0, 1.0, 0.0]);
        assert_eq!(sv.marginal(&[2, 0]), vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sample_deterministic() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&GateKind::X, &[0]);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(sv.sample(100, &mut rng).iter().all(|&s| s == 1));
    }

    #[test]
    fn test_kraus_keeps_norm() {
        let gamma: f64 = 0.3;
        let k0 = gates::diagonal(&[Complex64::new(1.0, 0.0), Complex64::new((1.0 - gamma).sqrt(), 0.0)]);
        let mut k1 = Array2::<Complex64>::zeros((2, 2));
        k1[[0, 1]] = Complex64::new(gamma.sqrt(), 0.0);

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let mut sv = Statevector::new(1);
            sv.apply_gate(&GateKind::H, &[0]);
            sv.apply_kraus(0, &[k0.clone(), k1.clone()], &mut rng);
            assert!((sv.norm_sqr() - 1.0).abs() < 1e-10);
        }
    }
}
