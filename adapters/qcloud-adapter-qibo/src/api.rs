//! qibo cloud REST client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use qcloud_hal::{Counts, JobStatus};

use crate::error::{QiboError, QiboResult};
use crate::serialize::RawCircuit;

/// qibo cloud base URL.
pub const BASE_URL: &str = "https://cloud.qibo.science";

/// Variable overriding [`BASE_URL`].
pub const ENDPOINT_VAR: &str = "QCLOUD_QIBO_URL";

/// qibo cloud client. The token travels in the `x-api-token` header.
pub struct QiboClient {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for QiboClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QiboClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl QiboClient {
    pub fn new(token: impl Into<String>) -> QiboResult<Self> {
        Self::with_base_url(BASE_URL, token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> QiboResult<Self> {
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

    async fn handle<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> QiboResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(QiboError::JobNotFound(message));
        }
        Err(QiboError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    /// Queue a circuit and return the job id.
    #[instrument(skip(self, request))]
    pub async fn submit(&self, request: &JobRequest) -> QiboResult<String> {
        let url = format!("{}/api/jobs/", self.base_url);
        debug!("POST {url} on {} ({})", request.device, request.project);
        let response = self
            .client
            .post(&url)
            .header("x-api-token", &self.token)
            .json(request)
            .send()
            .await?;
        let created: JobCreated = Self::handle(response).await?;
        Ok(created.pid)
    }

    /// Fetch a job, including its result once it has one.
    #[instrument(skip(self))]
    pub async fn job(&self, pid: &str) -> QiboResult<JobInfo> {
        let url = format!("{}/api/jobs/{pid}/", self.base_url);
        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .header("x-api-token", &self.token)
            .send()
            .await?;
        Self::handle(response).await
    }
}

/// Body of `POST /api/jobs/`.
#[derive(Debug, Serialize)]
pub struct JobRequest {
    pub circuit: RawCircuit,
    pub nshots: u32,
    pub device: String,
    pub project: String,
    pub verbatim: bool,
}

#[derive(Debug, Deserialize)]
struct JobCreated {
    pid: String,
}

/// Job as reported by `GET /api/jobs/{pid}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInfo {
    pub pid: String,
    pub status: String,
    #[serde(default)]
    pub result: Option<JobResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobInfo {
    /// `queueing` and `pending` are queued, `success` completes, `error`
    /// fails; anything else is still running.
    pub fn job_status(&self) -> JobStatus {
        match self.status.as_str() {
            "queueing" | "pending" => JobStatus::Queued,
            "success" => JobStatus::Completed,
            "error" => JobStatus::Failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| "job failed".into()),
            ),
            _ => JobStatus::Running,
        }
    }
}

/// Measurements of a finished job: per-shot samples, or frequencies keyed
/// with the first measured qubit leftmost.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobResult {
    #[serde(default)]
    pub samples: Option<Vec<Vec<u8>>>,
    #[serde(default)]
    pub frequencies: Option<Counts>,
}

impl JobResult {
    /// Sample rows, expanding frequencies when no samples were returned.
    pub fn rows(&self) -> QiboResult<Vec<Vec<u8>>> {
        if let Some(samples) = &self.samples {
            return Ok(samples.clone());
        }
        let Some(frequencies) = &self.frequencies else {
            return Err(QiboError::MalformedResult(
                "result has neither samples nor frequencies".into(),
            ));
        };
        let mut rows = Vec::new();
        for (key, count) in frequencies {
            let row = key
                .chars()
                .map(|c| match c {
                    '0' => Ok(0),
                    '1' => Ok(1),
                    other => Err(QiboError::MalformedResult(format!(
                        "unexpected character '{other}' in '{key}'"
                    ))),
                })
                .collect::<QiboResult<Vec<u8>>>()?;
            rows.extend(std::iter::repeat_n(row, *count as usize));
        }
        Ok(rows)
    }
}
