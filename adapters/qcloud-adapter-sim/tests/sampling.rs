//! Sampler properties.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qcloud_adapter_sim::{SimulatorBackend, Statevector};
use qcloud_ir::{Circuit, GateKind, QubitId};

fn single_qubit_kind() -> impl Strategy<Value = GateKind> {
    prop_oneof![
        Just(GateKind::H),
        Just(GateKind::X),
        Just(GateKind::S),
        Just(GateKind::T),
        (-3.0..3.0f64).prop_map(GateKind::Ry),
        (-3.0..3.0f64).prop_map(GateKind::Rx),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Sampled indices always carry non-zero probability.
    #[test]
    fn samples_have_support(
        ops in prop::collection::vec((single_qubit_kind(), 0usize..3), 0..12),
        entangle in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut sv = Statevector::new(3);
        for (kind, q) in &ops {
            sv.apply_gate(kind, &[*q]);
        }
        if entangle {
            sv.apply_gate(&GateKind::CNOT, &[0, 2]);
        }
        let probs = sv.probabilities();
        let total: f64 = probs.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);

        let mut rng = StdRng::seed_from_u64(seed);
        for index in sv.sample(64, &mut rng) {
            prop_assert!(probs[index] > 0.0, "sampled index {} with zero probability", index);
        }
    }

    /// Basis-state preparation is sampled deterministically.
    #[test]
    fn basis_states_are_deterministic(bits in prop::collection::vec(any::<bool>(), 1..6)) {
        let mut circuit = Circuit::new(bits.len());
        for (q, bit) in bits.iter().enumerate() {
            if *bit {
                circuit.x(QubitId(q as u32)).unwrap();
            }
        }
        circuit.measure_all().unwrap();

        let outcome = SimulatorBackend::new().with_seed(9).run(&circuit, 20).unwrap();
        let expected: Vec<u8> = bits.iter().map(|b| u8::from(*b)).collect();
        prop_assert!(outcome.samples().iter().all(|row| row == &expected));
    }
}

#[test]
fn rx_pi_over_7_marginal() {
    let theta = std::f64::consts::PI / 7.0;
    let mut circuit = Circuit::new(3);
    circuit.rx(theta, QubitId(0)).unwrap();
    circuit.measure_all().unwrap();

    let outcome = SimulatorBackend::new().with_seed(2024).run(&circuit, 1000).unwrap();
    let p1 = outcome.probabilities(Some(&[QubitId(0)])).unwrap()[1];
    let expected = (std::f64::consts::PI / 14.0).sin().powi(2);
    assert!((p1 - expected).abs() <= 0.1, "P(q0=1) = {p1}, expected {expected}");
}
