//! Client backend trait and configuration.
//!
//! A client backend takes a [`Circuit`] and a shot count and returns a
//! [`MeasurementOutcome`] once the provider has finished the job:
//!
//! ```text
//!   check_preconditions ──→ convert ──→ submit ──→ poll ──→ outcome
//!        (sync)              (sync)     (async)    (async)
//! ```

use std::fmt;

use async_trait::async_trait;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qcloud_ir::Circuit;

use crate::auth::CredentialSource;
use crate::error::{HalError, HalResult};
use crate::result::MeasurementOutcome;

/// Shot count used when the caller does not choose one.
pub const DEFAULT_SHOTS: u32 = 1000;

/// Per-call execution options.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Initial state vector. Accepted by the interface, rejected by every
    /// client.
    pub initial_state: Option<Vec<Complex64>>,
    /// Overrides the client's configured verbatim flag.
    pub verbatim: Option<bool>,
    /// Provider-specific options forwarded as-is where supported.
    pub run_options: serde_json::Map<String, serde_json::Value>,
}

impl ExecuteOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request verbatim (uncompiled) execution.
    pub fn with_verbatim(mut self, verbatim: bool) -> Self {
        self.verbatim = Some(verbatim);
        self
    }

    /// Add a provider-specific run option.
    pub fn with_run_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.run_options.insert(key.into(), value);
        self
    }

    /// Set an initial state.
    pub fn with_initial_state(mut self, state: Vec<Complex64>) -> Self {
        self.initial_state = Some(state);
        self
    }
}

/// Construction-time configuration shared by every client.
///
/// Fields a client does not use are ignored by it.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Explicit API token; overrides the client's credential variable.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Target platform or device name (`k2`, `ionq_simulator`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Project to bill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Provider selector (`basic_simulator`, `aer_simulator`, `ibm-q`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Device selector: a Braket ARN or a friendly device name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// API endpoint URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Default verbatim flag.
    #[serde(default)]
    pub verbatim: bool,
    /// Report job progress at `info` level.
    #[serde(default)]
    pub verbose: bool,
    /// Transpiler optimisation level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization_level: Option<u8>,
    /// Noise channel name for noisy local simulation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_type: Option<String>,
    /// Noise channel strength in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_level: Option<f64>,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClientConfig {
    /// Empty configuration; every client falls back to its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authentication token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the platform.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the device.
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the default verbatim flag.
    pub fn with_verbatim(mut self, verbatim: bool) -> Self {
        self.verbatim = verbatim;
        self
    }

    /// Enable progress reporting.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the optimisation level.
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = Some(level);
        self
    }

    /// Set the noise channel and its strength.
    pub fn with_noise(mut self, noise_type: impl Into<String>, level: f64) -> Self {
        self.noise_type = Some(noise_type.into());
        self.noise_level = Some(level);
        self
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("platform", &self.platform)
            .field("project", &self.project)
            .field("provider", &self.provider)
            .field("device", &self.device)
            .field("endpoint", &self.endpoint)
            .field("verbatim", &self.verbatim)
            .field("verbose", &self.verbose)
            .field("optimization_level", &self.optimization_level)
            .field("noise_type", &self.noise_type)
            .field("noise_level", &self.noise_level)
            .field("extra", &self.extra)
            .finish()
    }
}

/// A handle able to run circuits on one provider.
///
/// `execute` resolves only once the provider job is terminal. Clients hold
/// no mutable state between calls.
#[async_trait]
pub trait ClientBackend: Send + Sync {
    /// Client name, e.g. `braket-client`.
    fn name(&self) -> &str;

    /// Run `circuit` for `shots` shots and return the measured samples.
    async fn execute(
        &self,
        circuit: &Circuit,
        shots: u32,
        options: &ExecuteOptions,
    ) -> HalResult<MeasurementOutcome>;
}

/// Construct a client from configuration.
#[async_trait]
pub trait ClientFactory: ClientBackend + Sized {
    /// Build the client, reading missing credentials from `credentials`.
    async fn from_config(config: &ClientConfig, credentials: &CredentialSource) -> HalResult<Self>;
}

/// Checks every client performs before any conversion or device call.
pub fn check_preconditions(
    circuit: &Circuit,
    shots: u32,
    options: &ExecuteOptions,
) -> HalResult<()> {
    if options.initial_state.is_some() {
        return Err(HalError::NotImplemented(
            "The use of an `initial_state` is not supported yet.".into(),
        ));
    }
    if !circuit.has_measurements() {
        return Err(HalError::NoMeasurement);
    }
    if shots == 0 {
        return Err(HalError::InvalidShots("shots must be at least 1".into()));
    }
    Ok(())
}
