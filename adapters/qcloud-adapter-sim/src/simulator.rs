//! Simulator backend implementation.

use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};
use uuid::Uuid;

use qcloud_hal::{
    ClientBackend, ExecuteOptions, HalError, HalResult, MeasurementOutcome, check_preconditions,
};
use qcloud_ir::{Circuit, QubitId};

use crate::error::SimError;
use crate::noise::NoiseModel;
use crate::statevector::Statevector;

/// Largest register the simulator accepts by default (256 MiB of amplitudes).
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Local statevector simulator.
///
/// Without noise the circuit is simulated once and all shots are drawn from
/// the final state. With a [`NoiseModel`] every shot is an independent
/// quantum trajectory.
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    max_qubits: usize,
    seed: Option<u64>,
    noise: Option<NoiseModel>,
}

impl SimulatorBackend {
    /// Create a new noiseless simulator with default settings.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: None,
            noise: None,
        }
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Fix the sampling seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attach a noise model.
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn noise(&self) -> Option<&NoiseModel> {
        self.noise.as_ref()
    }

    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    fn check_size(&self, num_qubits: usize) -> HalResult<()> {
        if num_qubits > self.max_qubits {
            return Err(SimError::TooManyQubits {
                qubits: num_qubits,
                max: self.max_qubits,
            }
            .into());
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// The noiseless final state of `circuit`, ignoring measurements.
    pub fn final_state(&self, circuit: &Circuit) -> HalResult<Statevector> {
        self.check_size(circuit.num_qubits())?;
        let mut sv = Statevector::new(circuit.num_qubits());
        for (_, gate) in circuit.gates() {
            let qubits: Vec<usize> = gate.qubits().iter().map(|q| q.index()).collect();
            sv.apply_gate(gate.kind(), &qubits);
        }
        Ok(sv)
    }

    /// Exact noiseless marginal distribution over `qubits`, big-endian in
    /// list order.
    pub fn probabilities(&self, circuit: &Circuit, qubits: &[QubitId]) -> HalResult<Vec<f64>> {
        if let Some(q) = qubits.iter().find(|q| q.index() >= circuit.num_qubits()) {
            return Err(HalError::InvalidCircuit(format!(
                "qubit {q} is outside the {}-qubit circuit",
                circuit.num_qubits()
            )));
        }
        let sv = self.final_state(circuit)?;
        let indices: Vec<usize> = qubits.iter().map(|q| q.index()).collect();
        Ok(sv.marginal(&indices))
    }

    /// Simulate `shots` shots and collect the measured columns.
    #[instrument(skip(self, circuit))]
    pub fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<MeasurementOutcome> {
        self.check_size(circuit.num_qubits())?;
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        debug!(
            "Simulation {run_id}: {} qubits, {} gates, {shots} shots, noise: {}",
            circuit.num_qubits(),
            circuit.gate_count(),
            self.noise.is_some()
        );

        let mut rng = self.rng();
        let outcomes = match &self.noise {
            None => self.final_state(circuit)?.sample(shots as usize, &mut rng),
            Some(noise) => (0..shots)
                .map(|_| {
                    let sv = trajectory(circuit, noise, &mut rng);
                    sv.sample(1, &mut rng)[0]
                })
                .collect(),
        };

        let columns: Vec<usize> = circuit.measured_qubits().iter().map(|q| q.index()).collect();
        let samples = rows_from_outcomes(&outcomes, &columns);
        debug!("Simulation {run_id} completed in {:?}", start.elapsed());

        MeasurementOutcome::new(circuit.measurements().cloned().collect(), samples, shots)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn trajectory(circuit: &Circuit, noise: &NoiseModel, rng: &mut StdRng) -> Statevector {
    let mut sv = Statevector::new(circuit.num_qubits());
    for (_, gate) in circuit.gates() {
        let qubits: Vec<usize> = gate.qubits().iter().map(|q| q.index()).collect();
        sv.apply_gate(gate.kind(), &qubits);
        if NoiseModel::applies_to(gate.kind()) {
            sv.apply_kraus(qubits[0], noise.kraus_operators(), rng);
        }
    }
    sv
}

/// Turn sampled basis-state indices into sample rows holding the bits of
/// `columns`, in order.
pub fn rows_from_outcomes(outcomes: &[usize], columns: &[usize]) -> Vec<Vec<u8>> {
    outcomes
        .iter()
        .map(|&index| {
            columns
                .iter()
                .map(|&q| u8::from((index >> q) & 1 == 1))
                .collect()
        })
        .collect()
}

#[async_trait]
impl ClientBackend for SimulatorBackend {
    fn name(&self) -> &str {
        "simulator"
    }

    async fn execute(
        &self,
        circuit: &Circuit,
        shots: u32,
        options: &ExecuteOptions,
    ) -> HalResult<MeasurementOutcome> {
        check_preconditions(circuit, shots, options)?;
        self.run(circuit, shots)
    }
}
