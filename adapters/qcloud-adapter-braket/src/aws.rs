//! Remote Braket devices.

use async_trait::async_trait;
use tracing::{debug, warn};

use qcloud_hal::CredentialSource;

use crate::api::{BraketClient, BraketSettings};
use crate::device::{provider_from_arn, qubit_capacity};
use crate::error::{BraketError, BraketResult};
use crate::task::{BraketDevice, BraketProgram, QuantumTask, TaskResult, TaskStatus};

/// A Braket QPU or managed simulator addressed by ARN.
#[derive(Debug)]
pub struct AwsDevice {
    client: BraketClient,
    arn: String,
}

impl AwsDevice {
    /// Connect to the device at `arn`.
    ///
    /// The result bucket is read from `QCLOUD_BRAKET_S3_BUCKET` in
    /// `credentials`; AWS credentials come from the SDK default chain.
    pub async fn connect(arn: impl Into<String>, credentials: &CredentialSource) -> BraketResult<Self> {
        let arn = arn.into();
        let settings = BraketSettings::from_source(credentials)?;
        debug!(
            "Connecting to {arn} ({}) in {}",
            provider_from_arn(&arn),
            settings.region
        );
        let client = BraketClient::new(settings).await;
        Ok(Self { client, arn })
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }
}

#[async_trait]
impl BraketDevice for AwsDevice {
    fn name(&self) -> &str {
        &self.arn
    }

    async fn run(&self, program: &BraketProgram, shots: u32) -> BraketResult<QuantumTask> {
        if let (BraketProgram::Circuit(circuit), Some(available)) =
            (program, qubit_capacity(&self.arn))
        {
            let required = circuit.qubit_count() as usize;
            if required > available {
                return Err(BraketError::TooManyQubits {
                    required,
                    available,
                });
            }
        }
        if !self.client.device_online(&self.arn).await? {
            warn!("Device {} is not online, the task will queue", self.arn);
        }

        let source = program.source();
        let task_arn = self.client.create_task(&self.arn, &source, shots).await?;
        Ok(QuantumTask::new(task_arn))
    }

    async fn state(&self, task: &QuantumTask) -> BraketResult<TaskStatus> {
        self.client.get_task_status(&task.id).await
    }

    async fn result(&self, task: &QuantumTask) -> BraketResult<TaskResult> {
        self.client.get_task_result(&task.id).await
    }
}
