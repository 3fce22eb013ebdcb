//! End-to-end execution through the Braket clients.

use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rand::rngs::StdRng;
use num_complex::Complex64;
use rand::{Rng, SeedableRng};

use qcloud_adapter_braket::{
    AwsClientBackend, BraketClientBackend, BraketDevice, BraketProgram, BraketResult,
    LocalSimulator, QuantumTask, TaskResult, TaskStatus,
};
use qcloud_adapter_sim::SimulatorBackend;
use qcloud_hal::{ClientBackend, ExecuteOptions, HalError, Poller};
use qcloud_ir::{Circuit, QubitId};

/// Device that records calls and replays a scripted status sequence.
#[derive(Default)]
struct CountingDevice {
    runs: AtomicUsize,
    polls: AtomicUsize,
    results: AtomicUsize,
    queued_polls: usize,
    failure: Option<String>,
}

#[async_trait]
impl BraketDevice for CountingDevice {
    fn name(&self) -> &str {
        "counting"
    }

    async fn run(&self, _program: &BraketProgram, _shots: u32) -> BraketResult<QuantumTask> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(QuantumTask::new("task-1"))
    }

    async fn state(&self, _task: &QuantumTask) -> BraketResult<TaskStatus> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst);
        if n < self.queued_polls {
            return Ok(TaskStatus::Queued);
        }
        Ok(match &self.failure {
            Some(reason) => TaskStatus::Failed(reason.clone()),
            None => TaskStatus::Completed,
        })
    }

    async fn result(&self, _task: &QuantumTask) -> BraketResult<TaskResult> {
        self.results.fetch_add(1, Ordering::SeqCst);
        // Columns reported as (q1, q0).
        let json = r#"{"measurementCounts": {"10": 3, "01": 1}, "measuredQubits": [1, 0]}"#;
        Ok(serde_json::from_str(json)?)
    }
}

fn random_clifford(num_qubits: u32, depth: usize, seed: u64) -> Circuit {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut circuit = Circuit::new(num_qubits as usize);
    for _ in 0..depth {
        let a = QubitId(rng.gen_range(0..num_qubits));
        let b = QubitId((a.0 + rng.gen_range(1..num_qubits)) % num_qubits);
        match rng.gen_range(0..9) {
            0 => circuit.h(a),
            1 => circuit.s(a),
            2 => circuit.sdg(a),
            3 => circuit.x(a),
            4 => circuit.y(a),
            5 => circuit.sx(a),
            6 => circuit.cnot(a, b),
            7 => circuit.cz(a, b),
            _ => circuit.swap(a, b),
        }
        .unwrap();
    }
    circuit.measure_all().unwrap();
    circuit
}

fn total_variation(p: &[f64], q: &[f64]) -> f64 {
    p.iter().zip(q).map(|(a, b)| (a - b).abs()).sum::<f64>() / 2.0
}

async fn assert_close_to_reference(backend: &dyn ClientBackend, seed: u64) {
    let circuit = random_clifford(4, 24, seed);
    let qubits = circuit.measured_qubits();
    let exact = SimulatorBackend::new()
        .probabilities(&circuit, &qubits)
        .unwrap();

    let outcome = backend
        .execute(&circuit, 2000, &ExecuteOptions::new())
        .await
        .unwrap();
    let sampled = outcome.probabilities(None).unwrap();
    let tv = total_variation(&exact, &sampled);
    assert!(tv <= 0.1, "{} seed {seed}: total variation {tv}", backend.name());
}

#[tokio::test]
async fn no_measurement_never_reaches_the_device() {
    let device = Arc::new(CountingDevice::default());
    let mut circuit = Circuit::new(2);
    circuit.h(QubitId(0)).unwrap();

    let braket = BraketClientBackend::new(device.clone());
    let err = braket
        .execute(&circuit, 100, &ExecuteOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::NoMeasurement));

    let aws = AwsClientBackend::new(device.clone());
    let err = aws
        .execute(&circuit, 100, &ExecuteOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::NoMeasurement));

    assert_eq!(device.runs.load(Ordering::SeqCst), 0);
    assert_eq!(device.polls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn initial_state_is_rejected_before_submission() {
    let device = Arc::new(CountingDevice::default());
    let backend = BraketClientBackend::new(device.clone());
    let options = ExecuteOptions::new().with_initial_state(vec![Complex64::new(1.0, 0.0)]);

    let err = backend
        .execute(&Circuit::bell().unwrap(), 10, &options)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "The use of an `initial_state` is not supported yet.");
    assert_eq!(device.runs.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn polls_until_completed_and_reorders_columns() {
    let device = Arc::new(CountingDevice {
        queued_polls: 3,
        ..CountingDevice::default()
    });
    let backend = BraketClientBackend::new(device.clone()).with_poller(Poller::default());

    let outcome = backend
        .execute(&Circuit::bell().unwrap(), 4, &ExecuteOptions::new())
        .await
        .unwrap();

    assert_eq!(device.runs.load(Ordering::SeqCst), 1);
    assert_eq!(device.polls.load(Ordering::SeqCst), 4);
    assert_eq!(device.results.load(Ordering::SeqCst), 1);

    // "10" over (q1, q0) is q0 = 0, q1 = 1.
    let counts = outcome.frequencies();
    assert_eq!(counts.get("01"), Some(&3));
    assert_eq!(counts.get("10"), Some(&1));
}

#[tokio::test]
async fn failed_task_surfaces_reason() {
    let device = Arc::new(CountingDevice {
        failure: Some("device calibrating".into()),
        ..CountingDevice::default()
    });
    let err = BraketClientBackend::new(device.clone())
        .execute(&Circuit::bell().unwrap(), 10, &ExecuteOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::JobFailed(reason) if reason == "device calibrating"));
    assert_eq!(device.results.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn local_simulator_matches_reference_on_clifford_circuits() {
    let backend = BraketClientBackend::new(Arc::new(LocalSimulator::new().with_seed(11)));
    for seed in 0..5 {
        assert_close_to_reference(&backend, seed).await;
    }
}

#[tokio::test]
async fn verbatim_local_run_matches_reference() {
    let backend =
        BraketClientBackend::new(Arc::new(LocalSimulator::new().with_seed(5))).with_verbatim(true);
    assert_close_to_reference(&backend, 42).await;
}

#[tokio::test]
async fn textual_bridge_matches_reference_on_clifford_circuits() {
    let backend = AwsClientBackend::new(Arc::new(LocalSimulator::new().with_seed(13)));
    for seed in 100..105 {
        assert_close_to_reference(&backend, seed).await;
    }
    let verbatim = AwsClientBackend::new(Arc::new(LocalSimulator::new().with_seed(17)))
        .with_verbatim(true);
    assert_close_to_reference(&verbatim, 7).await;
}

#[tokio::test]
async fn rx_pi_over_seven_marginal() {
    let mut circuit = Circuit::new(3);
    circuit.rx(PI / 7.0, QubitId(0)).unwrap();
    circuit.measure_all().unwrap();
    let expected = (PI / 14.0).sin().powi(2);

    for backend in [
        Box::new(BraketClientBackend::local()) as Box<dyn ClientBackend>,
        Box::new(AwsClientBackend::local()),
    ] {
        let outcome = backend
            .execute(&circuit, 1000, &ExecuteOptions::new())
            .await
            .unwrap();
        let p1 = outcome.probabilities(Some(&[QubitId(0)])).unwrap()[1];
        assert!((p1 - expected).abs() <= 0.1, "{}: p1 = {p1}", backend.name());
    }
}
