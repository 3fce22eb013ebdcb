//! IonQ client backend.

use async_trait::async_trait;
use tracing::{debug, instrument};

use qcloud_hal::auth::IONQ_TOKEN_VAR;
use qcloud_hal::{
    ClientBackend, ClientConfig, ClientFactory, Counts, CredentialSource, EnvTokenProvider,
    ExecuteOptions, HalError, HalResult, Job, MeasurementOutcome, Poller, check_preconditions,
    resolve_token,
};
use qcloud_ir::{Circuit, QubitId};

use crate::api::{BASE_URL, ENDPOINT_VAR, Histogram, IonQClient, JobRequest};
use crate::error::{IonQError, IonQResult};
use crate::translate::to_ionq;

/// Platform used when none is configured.
pub const DEFAULT_PLATFORM: &str = "ionq_simulator";

/// The API `target` for a platform name.
///
/// `ionq_simulator` → `simulator`, `ionq_qpu.aria-1` → `qpu.aria-1`. Bare
/// API targets pass through.
pub fn target_for_platform(platform: &str) -> IonQResult<String> {
    let target = platform.strip_prefix("ionq_").unwrap_or(platform);
    if target == "simulator" || target == "qpu" || target.starts_with("qpu.") {
        Ok(target.to_string())
    } else {
        Err(IonQError::UnknownPlatform(platform.to_string()))
    }
}

/// Turn a probability histogram into shot counts over `measured`.
///
/// Keys of the result list `measured[0]` as the rightmost character. Counts
/// are apportioned by largest remainder so they sum to `shots`.
pub fn counts_from_histogram(
    histogram: &Histogram,
    measured: &[QubitId],
    shots: u32,
) -> IonQResult<Counts> {
    let mut weights: std::collections::BTreeMap<String, f64> = Default::default();
    for (state, probability) in histogram {
        let index: u64 = state
            .parse()
            .map_err(|_| IonQError::MalformedResult(format!("basis state '{state}'")))?;
        let key: String = measured
            .iter()
            .rev()
            .map(|q| if index.checked_shr(q.0).unwrap_or(0) & 1 == 1 { '1' } else { '0' })
            .collect();
        *weights.entry(key).or_insert(0.0) += probability;
    }

    let total: f64 = weights.values().sum();
    if total <= 0.0 {
        return Err(IonQError::MalformedResult("empty histogram".into()));
    }

    let exact: Vec<(String, f64)> = weights
        .into_iter()
        .map(|(key, w)| (key, w / total * f64::from(shots)))
        .collect();
    let mut counts: Counts = exact
        .iter()
        .map(|(key, x)| (key.clone(), x.floor() as u64))
        .collect();

    let assigned: u64 = counts.values().sum();
    let mut remainders: Vec<(&String, f64)> =
        exact.iter().map(|(key, x)| (key, x - x.floor())).collect();
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (key, _) in remainders
        .into_iter()
        .take((u64::from(shots).saturating_sub(assigned)) as usize)
    {
        if let Some(count) = counts.get_mut(key) {
            *count += 1;
        }
    }
    counts.retain(|_, count| *count > 0);
    Ok(counts)
}

/// Runs circuits on IonQ simulators and QPUs.
///
/// Backend options (`noise`, ...) given at construction are sent with every
/// job; per-call `run_options` override them key by key.
pub struct IonQClientBackend {
    client: IonQClient,
    platform: String,
    target: String,
    options: serde_json::Map<String, serde_json::Value>,
    poller: Poller,
}

impl IonQClientBackend {
    /// Client for `platform` on the production endpoint.
    pub fn new(token: impl Into<String>, platform: &str) -> IonQResult<Self> {
        Self::with_client(IonQClient::new(token)?, platform)
    }

    fn with_client(client: IonQClient, platform: &str) -> IonQResult<Self> {
        Ok(Self {
            client,
            platform: platform.to_string(),
            target: target_for_platform(platform)?,
            options: serde_json::Map::new(),
            poller: Poller::default(),
        })
    }

    pub fn with_options(mut self, options: serde_json::Map<String, serde_json::Value>) -> Self {
        self.options = options;
        self
    }

    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.poller = poller;
        self
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    fn request_options(
        &self,
        options: &ExecuteOptions,
    ) -> serde_json::Map<String, serde_json::Value> {
        let mut merged = self.options.clone();
        merged.extend(options.run_options.clone());
        merged
    }

    async fn run(&self, request: &JobRequest) -> HalResult<Histogram> {
        let submitted = self.client.submit_job(request).await?;
        let mut job = Job::new(submitted.id.clone(), self.name(), request.shots);
        self.poller
            .wait(&mut job, || async {
                self.client
                    .get_job(&submitted.id)
                    .await
                    .map(|info| info.job_status())
                    .map_err(HalError::from)
            })
            .await?;
        debug!("IonQ job {} completed", submitted.id);
        Ok(self.client.get_results(&submitted.id).await?)
    }
}

impl std::fmt::Debug for IonQClientBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IonQClientBackend")
            .field("client", &self.client)
            .field("platform", &self.platform)
            .field("options", &self.options)
            .finish()
    }
}

#[async_trait]
impl ClientBackend for IonQClientBackend {
    fn name(&self) -> &str {
        "ionq-client"
    }

    #[instrument(skip(self, circuit, options))]
    async fn execute(
        &self,
        circuit: &Circuit,
        shots: u32,
        options: &ExecuteOptions,
    ) -> HalResult<MeasurementOutcome> {
        check_preconditions(circuit, shots, options)?;
        let input = to_ionq(circuit)?;
        let request =
            JobRequest::new(&self.target, shots, input).with_options(self.request_options(options));

        let histogram = self.run(&request).await?;
        let counts = counts_from_histogram(&histogram, &circuit.measured_qubits(), shots)?;
        MeasurementOutcome::from_counts(circuit.measurements().cloned().collect(), &counts, shots)
    }
}

#[async_trait]
impl ClientFactory for IonQClientBackend {
    async fn from_config(config: &ClientConfig, credentials: &CredentialSource) -> HalResult<Self> {
        let provider = EnvTokenProvider::with_source(IONQ_TOKEN_VAR, credentials.clone());
        let token = resolve_token(config.token.as_deref(), &provider)?;
        let base_url = config
            .endpoint
            .clone()
            .or_else(|| credentials.get(ENDPOINT_VAR))
            .unwrap_or_else(|| BASE_URL.to_string());
        let platform = config.platform.as_deref().unwrap_or(DEFAULT_PLATFORM);

        let client = IonQClient::with_base_url(base_url, token)?;
        Ok(Self::with_client(client, platform)?
            .with_options(config.extra.clone())
            .with_poller(Poller::default().verbose(config.verbose)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(entries: &[(&str, f64)]) -> Histogram {
        entries.iter().map(|(k, p)| (k.to_string(), *p)).collect()
    }

    #[test]
    fn test_target_for_platform() {
        assert_eq!(target_for_platform("ionq_simulator").unwrap(), "simulator");
        assert_eq!(target_for_platform("ionq_qpu").unwrap(), "qpu");
        assert_eq!(target_for_platform("ionq_qpu.aria-1").unwrap(), "qpu.aria-1");
        assert_eq!(target_for_platform("simulator").unwrap(), "simulator");
        assert!(target_for_platform("k2").is_err());
    }

    #[test]
    fn test_histogram_to_counts() {
        // States 0 (|00>) and 3 (|11>).
        let counts =
            counts_from_histogram(&histogram(&[("0", 0.5), ("3", 0.5)]), &[QubitId(0), QubitId(1)], 100)
                .unwrap();
        assert_eq!(counts.get("00"), Some(&50));
        assert_eq!(counts.get("11"), Some(&50));
    }

    #[test]
    fn test_histogram_marginal_and_order() {
        // State 2 is q1 = 1, q0 = 0. Measuring only q1 then q0 lists q1 rightmost.
        let counts =
            counts_from_histogram(&histogram(&[("2", 1.0)]), &[QubitId(1), QubitId(0)], 10).unwrap();
        assert_eq!(counts.get("01"), Some(&10));

        let marginal = counts_from_histogram(
            &histogram(&[("1", 0.25), ("3", 0.25), ("0", 0.5)]),
            &[QubitId(0)],
            8,
        )
        .unwrap();
        assert_eq!(marginal.get("1"), Some(&4));
        assert_eq!(marginal.get("0"), Some(&4));
    }

    #[test]
    fn test_counts_sum_to_shots() {
        let third = 1.0 / 3.0;
        let counts = counts_from_histogram(
            &histogram(&[("0", third), ("1", third), ("2", third)]),
            &[QubitId(0), QubitId(1)],
            100,
        )
        .unwrap();
        assert_eq!(counts.values().sum::<u64>(), 100);
    }

    #[test]
    fn test_malformed_state() {
        assert!(matches!(
            counts_from_histogram(&histogram(&[("x1", 1.0)]), &[QubitId(0)], 1),
            Err(IonQError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_high_qubit_index_reads_as_zero() {
        let counts = counts_from_histogram(
            &histogram(&[("1", 1.0)]),
            &[QubitId(0), QubitId(64), QubitId(70)],
            8,
        )
        .unwrap();
        assert_eq!(counts, Counts::from([("001".to_string(), 8)]));
    }

    #[tokio::test]
    async fn test_factory_needs_token() {
        let credentials = CredentialSource::injected::<String, String>([]);
        let err = IonQClientBackend::from_config(&ClientConfig::new(), &credentials)
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::MissingCredential { var } if var == "IONQ_TOKEN"));
    }

    #[tokio::test]
    async fn test_factory_defaults() {
        let credentials = CredentialSource::injected([
            (IONQ_TOKEN_VAR, "key"),
            (ENDPOINT_VAR, "http://localhost:9/v0.3"),
        ]);
        let config = ClientConfig::new().with_extra("noise", serde_json::json!({"model": "harmony"}));
        let backend = IonQClientBackend::from_config(&config, &credentials)
            .await
            .unwrap();
        assert_eq!(backend.platform(), DEFAULT_PLATFORM);
        assert_eq!(backend.target(), "simulator");
        assert_eq!(backend.client.base_url(), "http://localhost:9/v0.3");

        let per_call = ExecuteOptions::new().with_run_option("noise", serde_json::json!({"model": "aria-1"}));
        let merged = backend.request_options(&per_call);
        assert_eq!(merged["noise"]["model"], "aria-1");
    }

    #[tokio::test]
    async fn test_preconditions_before_network() {
        let backend = IonQClientBackend::new("key", DEFAULT_PLATFORM).unwrap();
        let mut circuit = Circuit::new(1);
        circuit.h(QubitId(0)).unwrap();
        let err = backend
            .execute(&circuit, 10, &ExecuteOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::NoMeasurement));
    }
}
