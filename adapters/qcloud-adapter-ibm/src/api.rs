//! IBM Quantum runtime REST client.
//!
//! Only the pieces the sampler path needs: submit a Sampler V2 job, poll
//! its status, fetch its results.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use qcloud_hal::JobStatus;

use crate::error::{IbmError, IbmResult};

/// IBM Quantum Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// Variable overriding [`DEFAULT_ENDPOINT`].
pub const ENDPOINT_VAR: &str = "QCLOUD_IBM_URL";

/// Variable holding the service instance CRN.
pub const INSTANCE_VAR: &str = "IBM_SERVICE_CRN";

const USER_AGENT: &str = concat!("qcloud/", env!("CARGO_PKG_VERSION"));

/// IBM Quantum runtime client.
pub struct IbmClient {
    client: Client,
    endpoint: String,
    instance: Option<String>,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("instance", &self.instance)
            .finish()
    }
}

impl IbmClient {
    /// Client authenticating with a bearer token, optionally scoped to a
    /// service instance.
    pub fn new(
        endpoint: impl Into<String>,
        token: &str,
        instance: Option<String>,
    ) -> IbmResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| IbmError::InvalidToken)?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(crn) = &instance {
            headers.insert(
                "Service-CRN",
                header::HeaderValue::from_str(crn).map_err(|_| IbmError::InvalidOption {
                    key: "project".into(),
                    message: "not a valid header value".into(),
                })?,
            );
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            instance,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Submit a Sampler V2 job.
    #[instrument(skip(self, request))]
    pub async fn submit_sampler_job(&self, request: &SamplerJobRequest) -> IbmResult<SubmitResponse> {
        let url = format!("{}/v1/jobs", self.endpoint);
        debug!("POST {url} on {}", request.backend);
        let response = self.client.post(&url).json(request).send().await?;
        handle_response(response).await
    }

    /// Get job status.
    #[instrument(skip(self))]
    pub async fn get_job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        let url = format!("{}/v1/jobs/{job_id}", self.endpoint);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }

    /// Get job results.
    #[instrument(skip(self))]
    pub async fn get_job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        let url = format!("{}/v1/jobs/{job_id}/results", self.endpoint);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        handle_response(response).await
    }
}

async fn handle_response<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> IbmResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "no body".to_string());
    if status == StatusCode::NOT_FOUND {
        return Err(IbmError::JobNotFound(message));
    }
    Err(IbmError::ApiError {
        status: status.as_u16(),
        message,
    })
}

/// Body of `POST /v1/jobs` for the sampler primitive.
#[derive(Debug, Serialize)]
pub struct SamplerJobRequest {
    pub program_id: String,
    pub backend: String,
    pub params: SamplerParams,
}

/// Sampler V2 parameters: one PUB per circuit.
#[derive(Debug, Serialize)]
pub struct SamplerParams {
    pub version: u8,
    /// Each PUB is `[circuit, parameter values, shots]`.
    pub pubs: Vec<Value>,
    pub options: Value,
}

impl SamplerJobRequest {
    /// A single-circuit sampler job.
    pub fn new(backend: impl Into<String>, qasm: String, shots: u32, options: Value) -> Self {
        Self {
            program_id: "sampler".to_string(),
            backend: backend.into(),
            params: SamplerParams {
                version: 2,
                pubs: vec![serde_json::json!([qasm, {}, shots])],
                options,
            },
        }
    }
}

/// Job submission response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    pub id: String,
    /// Mixed case on the cloud API (`Queued`, `Running`, ...).
    pub status: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: Option<JobState>,
}

/// Job state with its failure reason.
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    #[serde(default)]
    pub reason: Option<String>,
}

impl JobStatusResponse {
    pub fn job_status(&self) -> JobStatus {
        match self.status.to_uppercase().as_str() {
            "QUEUED" | "INITIALIZING" => JobStatus::Queued,
            "COMPLETED" | "DONE" => JobStatus::Completed,
            "CANCELLED" => JobStatus::Cancelled,
            "FAILED" | "ERROR" => JobStatus::Failed(
                self.state
                    .as_ref()
                    .and_then(|s| s.reason.clone())
                    .unwrap_or_else(|| "job failed".into()),
            ),
            _ => JobStatus::Running,
        }
    }
}

/// Job result response.
#[derive(Debug, Deserialize)]
pub struct JobResultResponse {
    pub results: Vec<SamplerResult>,
}

/// Sampler result for one PUB: classical register name → data.
#[derive(Debug, Deserialize)]
pub struct SamplerResult {
    pub data: HashMap<String, ClassicalRegisterData>,
}

/// Per-shot samples of one classical register, as hex strings.
#[derive(Debug, Deserialize)]
pub struct ClassicalRegisterData {
    pub samples: Vec<String>,
}
