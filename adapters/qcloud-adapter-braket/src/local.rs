//! In-process Braket simulator.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use qcloud_adapter_sim::{DEFAULT_MAX_QUBITS, Statevector, rows_from_outcomes};
use qcloud_qasm::ast::Statement;

use crate::circuit::{BraketCircuit, BraketInstruction, BraketOp};
use crate::error::{BraketError, BraketResult};
use crate::gate::BraketGate;
use crate::task::{BraketDevice, BraketProgram, QuantumTask, TaskResult, TaskStatus};

/// Statevector simulator running Braket programs synchronously.
///
/// Tasks complete during `run`; their results stay available until fetched.
#[derive(Debug, Default)]
pub struct LocalSimulator {
    seed: Option<u64>,
    tasks: Mutex<FxHashMap<String, TaskResult>>,
}

impl LocalSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Simulate `program` and sample `shots` rows of its measured qubits.
    pub fn simulate(&self, program: &BraketProgram, shots: u32) -> BraketResult<TaskResult> {
        let (sv, measured) = match program {
            BraketProgram::Circuit(circuit) => evolve_circuit(circuit)?,
            BraketProgram::OpenQasm(source) => evolve_source(source)?,
        };
        let outcomes = sv.sample(shots as usize, &mut self.rng());
        let columns: Vec<usize> = measured.iter().map(|&q| q as usize).collect();
        Ok(TaskResult::from_measurements(
            rows_from_outcomes(&outcomes, &columns),
            measured,
        ))
    }
}

fn register(num_qubits: usize) -> BraketResult<Statevector> {
    if num_qubits > DEFAULT_MAX_QUBITS {
        return Err(BraketError::TooManyQubits {
            required: num_qubits,
            available: DEFAULT_MAX_QUBITS,
        });
    }
    Ok(Statevector::new(num_qubits))
}

fn apply(sv: &mut Statevector, instruction: &BraketInstruction) {
    let targets: Vec<usize> = instruction.target().iter().map(|&q| q as usize).collect();
    sv.apply_unitary(&targets, &instruction.gate().matrix());
}

fn evolve_circuit(circuit: &BraketCircuit) -> BraketResult<(Statevector, Vec<u32>)> {
    let mut sv = register(circuit.qubit_count() as usize)?;
    for op in circuit.ops() {
        if let BraketOp::Gate(instruction) = op {
            apply(&mut sv, instruction);
        }
    }
    Ok((sv, circuit.measured_qubits()))
}

fn evolve_source(source: &str) -> BraketResult<(Statevector, Vec<u32>)> {
    let program = qcloud_qasm::parse_program(source)?;
    let mut sv = register(program.num_qubits()? as usize)?;

    for statement in program.operations() {
        match statement {
            Statement::Gate(call) => {
                let angles: Vec<f64> = call.params.iter().map(|e| e.eval()).collect();
                let gate = BraketGate::from_ir(&call.name, &angles)?;
                let targets = call
                    .qubits
                    .iter()
                    .map(|q| program.resolve_qubit(q))
                    .collect::<Result<Vec<u32>, _>>()?;
                apply(&mut sv, &BraketInstruction::new(gate, targets)?);
            }
            Statement::Pragma(text) if text.starts_with("braket unitary") => {
                return Err(BraketError::NotImplemented(
                    "Unitary pragmas are not supported by the local simulator.".into(),
                ));
            }
            Statement::Pragma(text) => warn!("Ignoring pragma '{text}'"),
            _ => {}
        }
    }

    let measured = program
        .measurement_groups()?
        .into_iter()
        .flat_map(|(_, qubits)| qubits)
        .collect();
    Ok((sv, measured))
}

#[async_trait]
impl BraketDevice for LocalSimulator {
    fn name(&self) -> &str {
        "local"
    }

    async fn run(&self, program: &BraketProgram, shots: u32) -> BraketResult<QuantumTask> {
        let result = self.simulate(program, shots)?;
        let task = QuantumTask::new(Uuid::new_v4().to_string());
        debug!("Local task {} finished with {shots} shots", task.id);
        self.tasks.lock().await.insert(task.id.clone(), result);
        Ok(task)
    }

    async fn state(&self, task: &QuantumTask) -> BraketResult<TaskStatus> {
        if self.tasks.lock().await.contains_key(&task.id) {
            Ok(TaskStatus::Completed)
        } else {
            Err(BraketError::TaskNotFound(task.id.clone()))
        }
    }

    async fn result(&self, task: &QuantumTask) -> BraketResult<TaskResult> {
        self.tasks
            .lock()
            .await
            .remove(&task.id)
            .ok_or_else(|| BraketError::TaskNotFound(task.id.clone()))
    }
}
