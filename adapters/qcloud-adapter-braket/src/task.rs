//! Quantum tasks and the device abstraction they run on.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qcloud_hal::JobStatus;

use crate::circuit::BraketCircuit;
use crate::error::{BraketError, BraketResult};

/// A program submitted to a device.
#[derive(Debug, Clone, PartialEq)]
pub enum BraketProgram {
    /// Structured circuit from the translator.
    Circuit(BraketCircuit),
    /// OpenQASM source text.
    OpenQasm(String),
}

impl BraketProgram {
    /// The program as OpenQASM source.
    pub fn source(&self) -> String {
        match self {
            Self::Circuit(circuit) => circuit.to_openqasm(),
            Self::OpenQasm(text) => text.clone(),
        }
    }
}

/// Handle to a submitted task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuantumTask {
    /// Task ARN for remote devices, a UUID for the local simulator.
    pub id: String,
}

impl QuantumTask {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Quantum task status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task has been created.
    Created,
    /// Task is queued.
    Queued,
    /// Task is running.
    Running,
    /// Task completed successfully.
    Completed,
    /// Task failed with reason.
    Failed(String),
    /// Task is being cancelled.
    Cancelling,
    /// Task was cancelled.
    Cancelled,
}

impl TaskStatus {
    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed(_) | TaskStatus::Cancelled
        )
    }

    /// The matching job status.
    pub fn to_job_status(&self) -> JobStatus {
        match self {
            TaskStatus::Created | TaskStatus::Queued => JobStatus::Queued,
            TaskStatus::Running | TaskStatus::Cancelling => JobStatus::Running,
            TaskStatus::Completed => JobStatus::Completed,
            TaskStatus::Failed(reason) => JobStatus::Failed(reason.clone()),
            TaskStatus::Cancelled => JobStatus::Cancelled,
        }
    }
}

/// Task result in the Braket `results.json` shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Measurement counts (bitstring -> count).
    #[serde(default)]
    pub measurement_counts: Option<HashMap<String, u64>>,
    /// Measurement probabilities (bitstring -> probability).
    #[serde(default)]
    pub measurement_probabilities: Option<HashMap<String, f64>>,
    /// Raw measurements, one row per shot.
    #[serde(default)]
    pub measurements: Option<Vec<Vec<u8>>>,
    /// Qubit of each column.
    #[serde(default)]
    pub measured_qubits: Option<Vec<u32>>,
    /// Result metadata.
    #[serde(default)]
    pub additional_metadata: Option<serde_json::Value>,
}

impl TaskResult {
    /// Result holding raw per-shot rows.
    pub fn from_measurements(measurements: Vec<Vec<u8>>, measured_qubits: Vec<u32>) -> Self {
        Self {
            measurements: Some(measurements),
            measured_qubits: Some(measured_qubits),
            ..Self::default()
        }
    }

    /// Per-shot rows, columns following `measured_qubits`.
    ///
    /// Falls back to expanding `measurementCounts`, then to rounding
    /// `measurementProbabilities` against `shots`. Braket bitstrings list
    /// the first measured qubit leftmost.
    pub fn rows(&self, shots: u32) -> BraketResult<Vec<Vec<u8>>> {
        if let Some(measurements) = &self.measurements {
            return Ok(measurements.clone());
        }

        let mut weighted: Vec<(&String, u64)> = if let Some(counts) = &self.measurement_counts {
            counts.iter().map(|(k, &v)| (k, v)).collect()
        } else if let Some(probs) = &self.measurement_probabilities {
            probs
                .iter()
                .map(|(k, &p)| (k, (p * f64::from(shots)).max(0.0).round() as u64))
                .collect()
        } else {
            return Err(BraketError::ResultParseError(
                "result holds no measurements, counts or probabilities".into(),
            ));
        };

        weighted.sort();
        let mut rows = Vec::new();
        for (bitstring, count) in weighted {
            let row = bitstring
                .chars()
                .map(|c| match c {
                    '0' => Ok(0),
                    '1' => Ok(1),
                    other => Err(BraketError::ResultParseError(format!(
                        "unexpected character '{other}' in bitstring '{bitstring}'"
                    ))),
                })
                .collect::<BraketResult<Vec<u8>>>()?;
            for _ in 0..count {
                rows.push(row.clone());
            }
        }
        Ok(rows)
    }
}

/// Something that runs Braket programs.
#[async_trait]
pub trait BraketDevice: Send + Sync {
    /// Device name for logs.
    fn name(&self) -> &str;

    /// Submit a program.
    async fn run(&self, program: &BraketProgram, shots: u32) -> BraketResult<QuantumTask>;

    /// Current task state.
    async fn state(&self, task: &QuantumTask) -> BraketResult<TaskStatus>;

    /// Result of a completed task.
    async fn result(&self, task: &QuantumTask) -> BraketResult<TaskResult>;
}
