//! Job lifecycle types and the status poller.
//!
//! ```text
//!   submit ──→ Queued ──→ Running ──→ Completed
//!                │           │
//!                │           ├──→ Failed(reason)
//!                │           │
//!                └───────────┴──→ Cancelled
//! ```
//!
//! Terminal states (`Completed`, `Failed`, `Cancelled`) are permanent.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{HalError, HalResult};

/// Identifier assigned by a provider to a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Job is waiting in queue.
    Queued,
    /// Job is currently running.
    Running,
    /// Job completed successfully.
    Completed,
    /// Job failed with an error message.
    Failed(String),
    /// Job was cancelled.
    Cancelled,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    /// Check if the job is still pending (queued or running).
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A submitted job and its timestamps. Lives for one `execute` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The job identifier.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Number of shots requested.
    pub shots: u32,
    /// Client that submitted the job.
    pub client: String,
    /// Time the job was submitted.
    pub submitted_at: DateTime<Utc>,
    /// Time the job reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Record a freshly submitted job.
    pub fn new(id: impl Into<JobId>, client: impl Into<String>, shots: u32) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            shots,
            client: client.into(),
            submitted_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Update the status; the first terminal status stamps `finished_at`.
    pub fn update(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            return;
        }
        if status.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.status = status;
    }

    /// Wall-clock time between submission and completion.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.submitted_at)
    }
}

/// Default delay between two status requests to a remote provider.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls a job until it is terminal.
///
/// The delay is fixed, there is no backoff and no retry bound: a job that
/// never finishes is waited on forever.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    verbose: bool,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl Poller {
    /// Create a poller with the given fixed interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            verbose: false,
        }
    }

    /// Report progress at `info` instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Call `poll` until it reports a terminal status.
    ///
    /// Returns `Ok(())` on `Completed`, `JobFailed` / `JobCancelled` on the
    /// other terminal states, and propagates the first poll error unchanged.
    pub async fn wait<F, Fut>(&self, job: &mut Job, mut poll: F) -> HalResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = HalResult<JobStatus>>,
    {
        self.report(&format!("Job {} submitted to {}", job.id, job.client));
        let mut last: Option<JobStatus> = None;

        loop {
            let status = poll().await?;
            if last.as_ref() != Some(&status) {
                self.report(&format!("Job {}: {status}", job.id));
                last = Some(status.clone());
            }
            job.update(status.clone());

            match status {
                JobStatus::Completed => return Ok(()),
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }

    fn report(&self, message: &str) {
        if self.verbose {
            info!("{message}");
        } else {
            debug!("{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("error".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_terminal_status_is_permanent() {
        let mut job = Job::new("job-1", "test", 100);
        job.update(JobStatus::Running);
        assert!(job.finished_at.is_none());
        job.update(JobStatus::Completed);
        assert!(job.elapsed().is_some());
        job.update(JobStatus::Running);
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_waits_until_completed() {
        let calls = AtomicUsize::new(0);
        let mut job = Job::new("job-2", "test", 10);
        let poller = Poller::new(Duration::from_secs(1));

        poller
            .wait(&mut job, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok(match n {
                        0 | 1 => JobStatus::Queued,
                        2..=4 => JobStatus::Running,
                        _ => JobStatus::Completed,
                    })
                }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_has_no_retry_bound() {
        let calls = AtomicUsize::new(0);
        let mut job = Job::new("job-3", "test", 10);

        Poller::new(Duration::from_millis(500))
            .wait(&mut job, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok(if n < 5_000 {
                        JobStatus::Running
                    } else {
                        JobStatus::Completed
                    })
                }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 5_001);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_maps_failure() {
        let mut job = Job::new("job-4", "test", 10);
        let err = Poller::default()
            .wait(&mut job, || async { Ok(JobStatus::Failed("calibration".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::JobFailed(msg) if msg == "calibration"));

        let mut job = Job::new("job-5", "test", 10);
        let err = Poller::default()
            .wait(&mut job, || async { Ok(JobStatus::Cancelled) })
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::JobCancelled));
    }
}
