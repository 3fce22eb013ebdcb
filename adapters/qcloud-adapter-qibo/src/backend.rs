//! qibo cloud client backend.

use async_trait::async_trait;
use tracing::instrument;

use qcloud_hal::auth::QIBO_TOKEN_VAR;
use qcloud_hal::{
    ClientBackend, ClientConfig, ClientFactory, CredentialSource, EnvTokenProvider,
    ExecuteOptions, HalError, HalResult, Job, MeasurementOutcome, Poller, check_preconditions,
    resolve_token,
};
use qcloud_ir::Circuit;

use crate::api::{BASE_URL, ENDPOINT_VAR, JobRequest, QiboClient};
use crate::error::QiboError;
use crate::serialize::to_raw;

/// Project billed when none is configured.
pub const DEFAULT_PROJECT: &str = "personal";

/// Platform used when none is configured.
pub const DEFAULT_PLATFORM: &str = "k2";

/// Runs circuits on the qibo cloud.
pub struct QiboClientBackend {
    client: QiboClient,
    project: String,
    platform: String,
    verbatim: bool,
    poller: Poller,
}

impl QiboClientBackend {
    /// Client with the default project and platform.
    pub fn new(token: impl Into<String>) -> HalResult<Self> {
        Ok(Self::with_client(QiboClient::new(token)?))
    }

    fn with_client(client: QiboClient) -> Self {
        Self {
            client,
            project: DEFAULT_PROJECT.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            verbatim: false,
            poller: Poller::default(),
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Default verbatim flag, overridable per call.
    pub fn with_verbatim(mut self, verbatim: bool) -> Self {
        self.verbatim = verbatim;
        self
    }

    /// Report job progress at `info` level.
    pub fn with_verbosity(mut self, verbose: bool) -> Self {
        self.poller = self.poller.verbose(verbose);
        self
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    fn request(&self, circuit: &Circuit, shots: u32, options: &ExecuteOptions) -> JobRequest {
        JobRequest {
            circuit: to_raw(circuit),
            nshots: shots,
            device: self.platform.clone(),
            project: self.project.clone(),
            verbatim: options.verbatim.unwrap_or(self.verbatim),
        }
    }
}

impl std::fmt::Debug for QiboClientBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QiboClientBackend")
            .field("client", &self.client)
            .field("project", &self.project)
            .field("platform", &self.platform)
            .field("verbatim", &self.verbatim)
            .finish()
    }
}

#[async_trait]
impl ClientBackend for QiboClientBackend {
    fn name(&self) -> &str {
        "qibo-client"
    }

    #[instrument(skip(self, circuit, options))]
    async fn execute(
        &self,
        circuit: &Circuit,
        shots: u32,
        options: &ExecuteOptions,
    ) -> HalResult<MeasurementOutcome> {
        check_preconditions(circuit, shots, options)?;
        let request = self.request(circuit, shots, options);

        let pid = self.client.submit(&request).await?;
        let mut job = Job::new(pid.clone(), self.name(), shots);
        self.poller
            .wait(&mut job, || async {
                self.client
                    .job(&pid)
                    .await
                    .map(|info| info.job_status())
                    .map_err(HalError::from)
            })
            .await?;

        let result = self
            .client
            .job(&pid)
            .await?
            .result
            .ok_or_else(|| QiboError::MalformedResult(format!("job {pid} has no result")))?;
        MeasurementOutcome::new(circuit.measurements().cloned().collect(), result.rows()?, shots)
    }
}

#[async_trait]
impl ClientFactory for QiboClientBackend {
    async fn from_config(config: &ClientConfig, credentials: &CredentialSource) -> HalResult<Self> {
        let provider = EnvTokenProvider::with_source(QIBO_TOKEN_VAR, credentials.clone());
        let token = resolve_token(config.token.as_deref(), &provider)?;
        let base_url = config
            .endpoint
            .clone()
            .or_else(|| credentials.get(ENDPOINT_VAR))
            .unwrap_or_else(|| BASE_URL.to_string());

        let mut backend = Self::with_client(QiboClient::with_base_url(base_url, token)?)
            .with_verbatim(config.verbatim)
            .with_verbosity(config.verbose);
        if let Some(project) = &config.project {
            backend = backend.with_project(project);
        }
        if let Some(platform) = &config.platform {
            backend = backend.with_platform(platform);
        }
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcloud_ir::QubitId;

    #[tokio::test]
    async fn test_factory_needs_token() {
        let credentials = CredentialSource::injected::<String, String>([]);
        let err = QiboClientBackend::from_config(&ClientConfig::new(), &credentials)
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::MissingCredential { var } if var == "QIBO_CLIENT_TOKEN"));
    }

    #[tokio::test]
    async fn test_factory_defaults_and_overrides() {
        let credentials = CredentialSource::injected([(QIBO_TOKEN_VAR, "tok")]);
        let backend = QiboClientBackend::from_config(&ClientConfig::new(), &credentials)
            .await
            .unwrap();
        assert_eq!(backend.project(), "personal");
        assert_eq!(backend.platform(), "k2");
        assert_eq!(backend.client.base_url(), BASE_URL);

        let config = ClientConfig::new()
            .with_token("explicit")
            .with_project("lab")
            .with_platform("sim")
            .with_endpoint("http://localhost:8000/");
        let backend = QiboClientBackend::from_config(&config, &CredentialSource::injected::<String, String>([]))
            .await
            .unwrap();
        assert_eq!(backend.project(), "lab");
        assert_eq!(backend.platform(), "sim");
        assert_eq!(backend.client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_request_forwards_verbatim() {
        let backend = QiboClientBackend::new("tok").unwrap().with_verbatim(true);
        let circuit = Circuit::bell().unwrap();

        let request = backend.request(&circuit, 50, &ExecuteOptions::new());
        assert!(request.verbatim);
        assert_eq!(request.nshots, 50);
        assert_eq!(request.device, "k2");

        let request = backend.request(&circuit, 50, &ExecuteOptions::new().with_verbatim(false));
        assert!(!request.verbatim);
    }

    #[tokio::test]
    async fn test_preconditions_before_network() {
        let backend = QiboClientBackend::new("tok").unwrap();
        let mut circuit = Circuit::new(1);
        circuit.x(QubitId(0)).unwrap();
        let err = backend
            .execute(&circuit, 10, &ExecuteOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::NoMeasurement));

        let err = backend
            .execute(&Circuit::bell().unwrap(), 0, &ExecuteOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidShots(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let backend = QiboClientBackend::new("super-secret").unwrap();
        assert!(!format!("{backend:?}").contains("super-secret"));
    }
}
