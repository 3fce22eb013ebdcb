//! IonQ REST API client (v0.3).

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use qcloud_hal::JobStatus;

use crate::error::{IonQError, IonQResult};
use crate::translate::IonQCircuit;

/// IonQ cloud API base URL.
pub const BASE_URL: &str = "https://api.ionq.co/v0.3";

/// Variable overriding [`BASE_URL`].
pub const ENDPOINT_VAR: &str = "QCLOUD_IONQ_URL";

/// IonQ REST API client.
///
/// Authenticates with `Authorization: apiKey <token>`.
pub struct IonQClient {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for IonQClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IonQClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl IonQClient {
    /// Client for the production endpoint.
    pub fn new(token: impl Into<String>) -> IonQResult<Self> {
        Self::with_base_url(BASE_URL, token)
    }

    /// Client for a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> IonQResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> IonQResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("apiKey {}", self.token))
            .send()
            .await?;
        handle_response(resp).await
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> IonQResult<T> {
        let url = self.url(path);
        debug!("POST {}", url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("apiKey {}", self.token))
            .json(body)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// Submit a job.
    #[instrument(skip(self, request))]
    pub async fn submit_job(&self, request: &JobRequest) -> IonQResult<JobInfo> {
        debug!("Submitting {} shots to {}", request.shots, request.target);
        self.post("jobs", request).await
    }

    /// Fetch a job's status.
    #[instrument(skip(self))]
    pub async fn get_job(&self, job_id: &str) -> IonQResult<JobInfo> {
        self.get(&format!("jobs/{job_id}")).await
    }

    /// Fetch the probability histogram of a completed job.
    #[instrument(skip(self))]
    pub async fn get_results(&self, job_id: &str) -> IonQResult<Histogram> {
        self.get(&format!("jobs/{job_id}/results")).await
    }
}

async fn handle_response<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> IonQResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(IonQError::JobNotFound(message)),
        _ => Err(IonQError::ApiError {
            status: status.as_u16(),
            message,
        }),
    }
}

/// Request body for `POST /jobs`.
///
/// Backend options (e.g. `noise`) are flattened into the top level.
#[derive(Debug, Serialize)]
pub struct JobRequest {
    pub target: String,
    pub shots: u32,
    pub name: String,
    pub input: IonQCircuit,
    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl JobRequest {
    pub fn new(target: impl Into<String>, shots: u32, input: IonQCircuit) -> Self {
        Self {
            target: target.into(),
            shots,
            name: format!("qcloud-{}", uuid::Uuid::new_v4()),
            input,
            options: serde_json::Map::new(),
        }
    }

    pub fn with_options(mut self, options: serde_json::Map<String, serde_json::Value>) -> Self {
        self.options = options;
        self
    }
}

/// Job description returned by `POST /jobs` and `GET /jobs/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInfo {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub failure: Option<Failure>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Failure {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl JobInfo {
    /// Map the IonQ status onto the shared job status.
    ///
    /// `submitted` and `ready` are queued; unknown values count as running.
    pub fn job_status(&self) -> JobStatus {
        match self.status.to_lowercase().as_str() {
            "submitted" | "ready" => JobStatus::Queued,
            "completed" => JobStatus::Completed,
            "canceled" | "cancelled" => JobStatus::Cancelled,
            "failed" => JobStatus::Failed(
                self.failure
                    .as_ref()
                    .and_then(|f| f.error.clone().or_else(|| f.code.clone()))
                    .unwrap_or_else(|| "job failed".into()),
            ),
            _ => JobStatus::Running,
        }
    }
}

/// Basis state (decimal, qubit 0 least significant) → probability.
pub type Histogram = BTreeMap<String, f64>;
