//! Client backends for Amazon Braket.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use qcloud_hal::{
    ClientBackend, ClientConfig, ClientFactory, CredentialSource, ExecuteOptions, HalError,
    HalResult, Job, MeasurementOutcome, Poller, check_preconditions,
};
use qcloud_ir::Circuit;
use qcloud_qasm::{emit_qasm2, rewrite};

use crate::aws::AwsDevice;
use crate::device::DeviceSpec;
use crate::error::{BraketError, BraketResult};
use crate::local::LocalSimulator;
use crate::task::{BraketDevice, BraketProgram, TaskResult};
use crate::translate::to_braket;

/// Submit `program`, wait for the task and return its result.
async fn run_to_completion(
    device: &dyn BraketDevice,
    poller: &Poller,
    client: &str,
    program: &BraketProgram,
    shots: u32,
) -> HalResult<TaskResult> {
    let task = device.run(program, shots).await?;
    let mut job = Job::new(task.id.clone(), client, shots);
    poller
        .wait(&mut job, || async {
            device
                .state(&task)
                .await
                .map(|status| status.to_job_status())
                .map_err(HalError::from)
        })
        .await?;
    if let Some(elapsed) = job.elapsed() {
        debug!("Task {} finished after {elapsed}", task.id);
    }
    Ok(device.result(&task).await?)
}

/// Map a task result onto the circuit's measurement registers.
///
/// Result columns follow the device's `measuredQubits`, which may differ
/// from the circuit's register order.
fn outcome_from_result(
    circuit: &Circuit,
    result: &TaskResult,
    shots: u32,
) -> HalResult<MeasurementOutcome> {
    let rows = result.rows(shots)?;
    let wanted: Vec<u32> = circuit.measured_qubits().iter().map(|q| q.0).collect();
    let reported = result.measured_qubits.clone().unwrap_or_else(|| wanted.clone());

    let columns = wanted
        .iter()
        .map(|q| {
            reported.iter().position(|r| r == q).ok_or_else(|| {
                BraketError::ResultParseError(format!("qubit {q} missing from the result"))
            })
        })
        .collect::<BraketResult<Vec<usize>>>()?;

    let samples = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|&c| {
                    row.get(c).copied().ok_or_else(|| {
                        BraketError::ResultParseError(format!(
                            "row of width {} has no column {c}",
                            row.len()
                        ))
                    })
                })
                .collect::<BraketResult<Vec<u8>>>()
        })
        .collect::<BraketResult<Vec<_>>>()?;

    MeasurementOutcome::new(circuit.measurements().cloned().collect(), samples, shots)
}

async fn open_device(
    config: &ClientConfig,
    credentials: &CredentialSource,
) -> HalResult<Arc<dyn BraketDevice>> {
    let spec = DeviceSpec::parse(config.device.as_deref().unwrap_or_default())?;
    Ok(match spec {
        DeviceSpec::Local => Arc::new(LocalSimulator::new()),
        DeviceSpec::Arn(arn) => Arc::new(AwsDevice::connect(arn, credentials).await?),
    })
}

fn poller_for(config: &ClientConfig) -> Poller {
    Poller::default().verbose(config.verbose)
}

// ──────────────────────────────────────────────────────────────────────
// braket-client
// ──────────────────────────────────────────────────────────────────────

/// Runs circuits through the structured Braket translator.
///
/// Defaults to the local simulator; set `device` to an ARN or preset name
/// for a remote device.
pub struct BraketClientBackend {
    device: Arc<dyn BraketDevice>,
    verbatim: bool,
    poller: Poller,
}

impl BraketClientBackend {
    /// Client on an arbitrary device.
    pub fn new(device: Arc<dyn BraketDevice>) -> Self {
        Self {
            device,
            verbatim: false,
            poller: Poller::default(),
        }
    }

    /// Client on the local simulator.
    pub fn local() -> Self {
        Self::new(Arc::new(LocalSimulator::new()))
    }

    /// Default verbatim flag, overridable per call.
    pub fn with_verbatim(mut self, verbatim: bool) -> Self {
        self.verbatim = verbatim;
        self
    }

    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.poller = poller;
        self
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }
}

impl std::fmt::Debug for BraketClientBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraketClientBackend")
            .field("device", &self.device.name())
            .field("verbatim", &self.verbatim)
            .finish()
    }
}

#[async_trait]
impl ClientBackend for BraketClientBackend {
    fn name(&self) -> &str {
        "braket-client"
    }

    #[instrument(skip(self, circuit, options))]
    async fn execute(
        &self,
        circuit: &Circuit,
        shots: u32,
        options: &ExecuteOptions,
    ) -> HalResult<MeasurementOutcome> {
        check_preconditions(circuit, shots, options)?;
        let verbatim = options.verbatim.unwrap_or(self.verbatim);
        let program = BraketProgram::Circuit(to_braket(circuit, verbatim)?);

        let result =
            run_to_completion(self.device.as_ref(), &self.poller, self.name(), &program, shots)
                .await?;
        outcome_from_result(circuit, &result, shots)
    }
}

#[async_trait]
impl ClientFactory for BraketClientBackend {
    async fn from_config(config: &ClientConfig, credentials: &CredentialSource) -> HalResult<Self> {
        let device = open_device(config, credentials).await?;
        Ok(Self::new(device)
            .with_verbatim(config.verbatim)
            .with_poller(poller_for(config)))
    }
}

// ──────────────────────────────────────────────────────────────────────
// aws-client
// ──────────────────────────────────────────────────────────────────────

/// Runs circuits through the textual OpenQASM bridge.
///
/// The circuit is emitted as OpenQASM 2, its `include` dropped and its gate
/// names rewritten to the Braket vocabulary; with verbatim the gate block is
/// boxed.
pub struct AwsClientBackend {
    device: Arc<dyn BraketDevice>,
    verbatim: bool,
    poller: Poller,
}

impl AwsClientBackend {
    pub fn new(device: Arc<dyn BraketDevice>) -> Self {
        Self {
            device,
            verbatim: false,
            poller: Poller::default(),
        }
    }

    pub fn local() -> Self {
        Self::new(Arc::new(LocalSimulator::new()))
    }

    pub fn with_verbatim(mut self, verbatim: bool) -> Self {
        self.verbatim = verbatim;
        self
    }

    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.poller = poller;
        self
    }
}

impl std::fmt::Debug for AwsClientBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsClientBackend")
            .field("device", &self.device.name())
            .field("verbatim", &self.verbatim)
            .finish()
    }
}

/// The Braket source the textual bridge submits for `circuit`.
pub fn bridge_source(circuit: &Circuit, verbatim: bool) -> BraketResult<String> {
    let text = emit_qasm2(circuit)?;
    let text = rewrite::strip_include(&text)?;
    let text = rewrite::rename_gates(&text, rewrite::BRAKET_MNEMONICS)?;
    if verbatim {
        Ok(rewrite::insert_verbatim_box(&text)?)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl ClientBackend for AwsClientBackend {
    fn name(&self) -> &str {
        "aws-client"
    }

    #[instrument(skip(self, circuit, options))]
    async fn execute(
        &self,
        circuit: &Circuit,
        shots: u32,
        options: &ExecuteOptions,
    ) -> HalResult<MeasurementOutcome> {
        if !options.run_options.is_empty() {
            return Err(HalError::NotImplemented(
                "The use of additional arguments to `run()` is not supported yet.".into(),
            ));
        }
        check_preconditions(circuit, shots, options)?;
        let verbatim = options.verbatim.unwrap_or(self.verbatim);
        let program = BraketProgram::OpenQasm(bridge_source(circuit, verbatim)?);

        let result =
            run_to_completion(self.device.as_ref(), &self.poller, self.name(), &program, shots)
                .await?;
        outcome_from_result(circuit, &result, shots)
    }
}

#[async_trait]
impl ClientFactory for AwsClientBackend {
    async fn from_config(config: &ClientConfig, credentials: &CredentialSource) -> HalResult<Self> {
        let device = open_device(config, credentials).await?;
        Ok(Self::new(device)
            .with_verbatim(config.verbatim)
            .with_poller(poller_for(config)))
    }
}
