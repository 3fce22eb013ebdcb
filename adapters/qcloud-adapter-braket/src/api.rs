//! AWS Braket API client wrapper.
//!
//! Wraps the AWS SDK for Braket and S3: task creation, status lookup and
//! result retrieval from the task's output bucket.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use qcloud_hal::CredentialSource;

use crate::error::{BraketError, BraketResult};
use crate::task::{TaskResult, TaskStatus};

/// Variable naming the S3 bucket for task results.
pub const S3_BUCKET_VAR: &str = "QCLOUD_BRAKET_S3_BUCKET";
/// Variable holding the S3 key prefix.
pub const S3_PREFIX_VAR: &str = "QCLOUD_BRAKET_S3_PREFIX";
/// Variable holding the AWS region.
pub const REGION_VAR: &str = "AWS_REGION";

const DEFAULT_S3_PREFIX: &str = "qcloud-results";
const DEFAULT_REGION: &str = "us-east-1";

/// Where task results land and which region to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraketSettings {
    pub s3_bucket: String,
    pub s3_prefix: String,
    pub region: String,
}

impl BraketSettings {
    /// Read the settings from `source`; only the bucket is required.
    pub fn from_source(source: &CredentialSource) -> BraketResult<Self> {
        let s3_bucket = source.get(S3_BUCKET_VAR).ok_or(BraketError::MissingS3Bucket)?;
        Ok(Self {
            s3_bucket,
            s3_prefix: source
                .get(S3_PREFIX_VAR)
                .unwrap_or_else(|| DEFAULT_S3_PREFIX.to_string()),
            region: source
                .get(REGION_VAR)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }
}

/// AWS Braket API client.
pub struct BraketClient {
    braket: aws_sdk_braket::Client,
    s3: aws_sdk_s3::Client,
    settings: BraketSettings,
}

impl fmt::Debug for BraketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraketClient")
            .field("s3_bucket", &self.settings.s3_bucket)
            .field("s3_prefix", &self.settings.s3_prefix)
            .field("region", &self.settings.region)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl BraketClient {
    /// Create a new Braket client.
    ///
    /// AWS credentials come from the default chain (environment, SSO,
    /// config files, IAM role).
    pub async fn new(settings: BraketSettings) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()))
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(60))
                    .connect_timeout(Duration::from_secs(10))
                    .build(),
            )
            .load()
            .await;

        Self {
            braket: aws_sdk_braket::Client::new(&config),
            s3: aws_sdk_s3::Client::new(&config),
            settings,
        }
    }

    pub fn settings(&self) -> &BraketSettings {
        &self.settings
    }

    /// Whether the device currently accepts tasks.
    pub async fn device_online(&self, device_arn: &str) -> BraketResult<bool> {
        let resp = self
            .braket
            .get_device()
            .device_arn(device_arn)
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(e.to_string()))?;

        debug!(
            "Device {} ({}) is {:?}",
            resp.device_name(),
            resp.provider_name(),
            resp.device_status()
        );
        Ok(matches!(
            resp.device_status(),
            aws_sdk_braket::types::DeviceStatus::Online
        ))
    }

    /// Create a quantum task from OpenQASM source.
    pub async fn create_task(
        &self,
        device_arn: &str,
        qasm: &str,
        shots: u32,
    ) -> BraketResult<String> {
        let action = serde_json::json!({
            "braketSchemaHeader": {
                "name": "braket.ir.openqasm.program",
                "version": "1"
            },
            "source": qasm
        });

        let resp = self
            .braket
            .create_quantum_task()
            .device_arn(device_arn)
            .action(action.to_string())
            .shots(i64::from(shots))
            .output_s3_bucket(&self.settings.s3_bucket)
            .output_s3_key_prefix(&self.settings.s3_prefix)
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(e.to_string()))?;

        Ok(resp.quantum_task_arn().to_string())
    }

    /// Get quantum task status.
    pub async fn get_task_status(&self, task_arn: &str) -> BraketResult<TaskStatus> {
        use aws_sdk_braket::types::QuantumTaskStatus;

        let resp = self
            .braket
            .get_quantum_task()
            .quantum_task_arn(task_arn)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("ResourceNotFoundException") {
                    BraketError::TaskNotFound(task_arn.to_string())
                } else {
                    BraketError::BraketApi(e.to_string())
                }
            })?;

        let status = match resp.status() {
            QuantumTaskStatus::Created => TaskStatus::Created,
            QuantumTaskStatus::Queued => TaskStatus::Queued,
            QuantumTaskStatus::Running => TaskStatus::Running,
            QuantumTaskStatus::Completed => TaskStatus::Completed,
            QuantumTaskStatus::Failed => TaskStatus::Failed(
                resp.failure_reason()
                    .unwrap_or("Unknown failure")
                    .to_string(),
            ),
            QuantumTaskStatus::Cancelling => TaskStatus::Cancelling,
            QuantumTaskStatus::Cancelled => TaskStatus::Cancelled,
            other => TaskStatus::Failed(format!("Unknown status {other:?}")),
        };

        Ok(status)
    }

    /// Get task result from S3, stored under
    /// `{prefix}/{task_id}/results.json`.
    pub async fn get_task_result(&self, task_arn: &str) -> BraketResult<TaskResult> {
        let key = results_key(&self.settings.s3_prefix, task_arn)?;

        let resp = self
            .s3
            .get_object()
            .bucket(&self.settings.s3_bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        Ok(serde_json::from_slice(&body.into_bytes())?)
    }
}

/// S3 key of a task's result document.
fn results_key(prefix: &str, task_arn: &str) -> BraketResult<String> {
    // arn:aws:braket:<region>:<account>:quantum-task/<id>
    let task_id = task_arn
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| BraketError::TaskNotFound(task_arn.to_string()))?;
    Ok(format!("{prefix}/{task_id}/results.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let source = CredentialSource::injected([(S3_BUCKET_VAR, "my-bucket")]);
        let settings = BraketSettings::from_source(&source).unwrap();
        assert_eq!(settings.s3_bucket, "my-bucket");
        assert_eq!(settings.s3_prefix, "qcloud-results");
        assert_eq!(settings.region, "us-east-1");
    }

    #[test]
    fn test_settings_require_bucket() {
        let source = CredentialSource::injected([(REGION_VAR, "eu-north-1")]);
        assert!(matches!(
            BraketSettings::from_source(&source),
            Err(BraketError::MissingS3Bucket)
        ));
    }

    #[test]
    fn test_results_key() {
        let key = results_key(
            "runs",
            "arn:aws:braket:us-east-1:123456789012:quantum-task/abc-123",
        )
        .unwrap();
        assert_eq!(key, "runs/abc-123/results.json");
        assert!(results_key("runs", "quantum-task/").is_err());
    }
}
