//! Qiskit-style client backend.

use std::fmt;

use async_trait::async_trait;
use ndarray::Array2;
use num_complex::Complex64;
use serde_json::Value;
use tracing::{debug, instrument};

use qcloud_adapter_sim::{NoiseModel, SimulatorBackend};
use qcloud_hal::auth::IBM_TOKEN_VAR;
use qcloud_hal::{
    ClientBackend, ClientConfig, ClientFactory, Counts, CredentialSource, EnvTokenProvider,
    ExecuteOptions, HalError, HalResult, Job, MeasurementOutcome, Poller, check_preconditions,
    resolve_token, samples_from_counts,
};
use qcloud_ir::{Circuit, MeasurementRegister};
use qcloud_qasm::{emit_qasm2, emit_qasm3, rewrite};

use crate::api::{
    DEFAULT_ENDPOINT, ENDPOINT_VAR, INSTANCE_VAR, IbmClient, SamplerJobRequest, SamplerResult,
};
use crate::error::{IbmError, IbmResult};
use crate::transpile::{DEFAULT_OPTIMIZATION_LEVEL, TranspileOptions, validate_optimization_level};

/// Where circuits run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// Noiseless local statevector simulation.
    #[default]
    BasicSimulator,
    /// Local simulation with a noise channel after every noisy gate.
    AerSimulator,
    /// IBM Quantum runtime.
    IbmQ,
}

impl Provider {
    /// Parse a provider name; `None` selects the basic simulator.
    pub fn parse(name: Option<&str>) -> IbmResult<Self> {
        match name {
            None | Some("basic_simulator") => Ok(Self::BasicSimulator),
            Some("aer_simulator") => Ok(Self::AerSimulator),
            Some("ibm-q") => Ok(Self::IbmQ),
            Some(other) => Err(IbmError::UnsupportedProvider(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BasicSimulator => "basic_simulator",
            Self::AerSimulator => "aer_simulator",
            Self::IbmQ => "ibm-q",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

enum Engine {
    Local(SimulatorBackend),
    Remote {
        client: IbmClient,
        backend: String,
        poller: Poller,
    },
}

/// Runs circuits on the local qiskit-style simulators or the IBM runtime.
pub struct QiskitClientBackend {
    provider: Provider,
    engine: Engine,
    optimization_level: u8,
    transpile: Option<TranspileOptions>,
}

impl QiskitClientBackend {
    /// Noiseless local simulator.
    pub fn basic_simulator() -> Self {
        Self::with_engine(Provider::BasicSimulator, Engine::Local(SimulatorBackend::new()))
    }

    /// Noisy local simulator.
    pub fn aer_simulator(noise: NoiseModel) -> Self {
        Self::with_engine(
            Provider::AerSimulator,
            Engine::Local(SimulatorBackend::new().with_noise(noise)),
        )
    }

    /// IBM runtime backend `backend` (e.g. `ibm_torino`).
    pub fn remote(client: IbmClient, backend: impl Into<String>) -> Self {
        Self::with_engine(
            Provider::IbmQ,
            Engine::Remote {
                client,
                backend: backend.into(),
                poller: Poller::default(),
            },
        )
    }

    fn with_engine(provider: Provider, engine: Engine) -> Self {
        Self {
            provider,
            engine,
            optimization_level: DEFAULT_OPTIMIZATION_LEVEL,
            transpile: None,
        }
    }

    /// Set the optimisation level (`0..=3`).
    pub fn with_optimization_level(mut self, level: u8) -> IbmResult<Self> {
        self.optimization_level = validate_optimization_level(level)?;
        if let Some(transpile) = &mut self.transpile {
            transpile.optimization_level = level;
        }
        Ok(self)
    }

    /// Native gates and connectivity the circuits must respect.
    pub fn with_transpile_options(mut self, options: TranspileOptions) -> Self {
        self.optimization_level = options.optimization_level;
        self.transpile = Some(options);
        self
    }

    /// Fix the sampling seed of a local provider. No effect on `ibm-q`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        if let Engine::Local(sim) = &mut self.engine {
            *sim = sim.clone().with_seed(seed);
        }
        self
    }

    /// Report remote job progress at `info` level.
    pub fn with_verbosity(mut self, verbose: bool) -> Self {
        if let Engine::Remote { poller, .. } = &mut self.engine {
            *poller = poller.clone().verbose(verbose);
        }
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn optimization_level(&self) -> u8 {
        self.optimization_level
    }

    pub fn transpile_options(&self) -> Option<&TranspileOptions> {
        self.transpile.as_ref()
    }

    /// The runtime backend name, or the provider name for local providers.
    pub fn platform(&self) -> &str {
        match &self.engine {
            Engine::Local(_) => self.provider.name(),
            Engine::Remote { backend, .. } => backend,
        }
    }

    fn run_local(
        &self,
        sim: &SimulatorBackend,
        circuit: &Circuit,
        shots: u32,
    ) -> HalResult<MeasurementOutcome> {
        let loaded = reload(circuit)?;
        let outcome = sim.run(&loaded, shots)?;
        MeasurementOutcome::new(registers(circuit), outcome.samples().to_vec(), shots)
    }

    fn runtime_options(&self, options: &ExecuteOptions) -> Value {
        let mut runtime = match &self.transpile {
            Some(transpile) => transpile.runtime_options(),
            None => serde_json::json!({ "optimization_level": self.optimization_level }),
        };
        if let Value::Object(map) = &mut runtime {
            map.extend(options.run_options.clone());
        }
        runtime
    }

    async fn run_remote(
        &self,
        client: &IbmClient,
        backend: &str,
        poller: &Poller,
        circuit: &Circuit,
        shots: u32,
        options: &ExecuteOptions,
    ) -> HalResult<MeasurementOutcome> {
        let qasm = emit_qasm3(circuit).map_err(IbmError::from)?;
        let request = SamplerJobRequest::new(backend, qasm, shots, self.runtime_options(options));

        let submitted = client.submit_sampler_job(&request).await?;
        debug!("Submitted IBM job {} to {backend}", submitted.id);
        let mut job = Job::new(submitted.id.clone(), self.name(), shots);
        poller
            .wait(&mut job, || async {
                client
                    .get_job_status(&submitted.id)
                    .await
                    .map(|status| status.job_status())
                    .map_err(HalError::from)
            })
            .await?;

        let response = client.get_job_results(&submitted.id).await?;
        let result = response.results.first().ok_or_else(|| {
            IbmError::MalformedResult(format!("job {} returned no results", submitted.id))
        })?;
        let registers = registers(circuit);
        let counts = counts_from_sampler(result, &registers)?;
        debug!("IBM job {} returned {} distinct outcomes", submitted.id, counts.len());
        MeasurementOutcome::new(registers, samples_from_counts(&counts)?, shots)
    }
}

fn registers(circuit: &Circuit) -> Vec<MeasurementRegister> {
    circuit.measurements().cloned().collect()
}

/// Round-trip a circuit through OpenQASM 2 the way a qiskit loader sees it:
/// the default register is renamed to `meas`.
fn reload(circuit: &Circuit) -> IbmResult<Circuit> {
    let mut qasm = emit_qasm2(circuit)?;
    if !circuit.measurements().any(|r| r.name() == "meas") {
        qasm = rewrite::rename_identifier(&qasm, "register0", "meas")?;
    }
    Ok(qcloud_qasm::parse(&qasm)?)
}

/// Binary form of a hex sample, zero-filled to `width` bits.
pub fn hex_to_binary(hex: &str, width: usize) -> IbmResult<String> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    let value = u128::from_str_radix(digits, 16)
        .map_err(|_| IbmError::MalformedResult(format!("sample '{hex}' is not hex")))?;
    let binary = format!("{value:0width$b}");
    if binary.len() > width {
        return Err(IbmError::MalformedResult(format!(
            "sample '{hex}' does not fit in {width} bits"
        )));
    }
    Ok(binary)
}

/// Aggregate per-shot hex samples into counts.
///
/// Keys follow the qiskit layout: the last register leftmost, and within a
/// register the first measured qubit rightmost.
pub fn counts_from_sampler(
    result: &SamplerResult,
    registers: &[MeasurementRegister],
) -> IbmResult<Counts> {
    let columns = registers
        .iter()
        .map(|register| {
            result
                .data
                .get(register.name())
                .map(|data| (register.qubits().len(), &data.samples))
                .ok_or_else(|| {
                    IbmError::MalformedResult(format!("no data for register '{}'", register.name()))
                })
        })
        .collect::<IbmResult<Vec<_>>>()?;

    let shots = columns.first().map_or(0, |(_, samples)| samples.len());
    if columns.iter().any(|(_, samples)| samples.len() != shots) {
        return Err(IbmError::MalformedResult(
            "registers report different shot counts".into(),
        ));
    }

    let mut counts = Counts::new();
    for shot in 0..shots {
        let key = columns
            .iter()
            .rev()
            .map(|(width, samples)| hex_to_binary(&samples[shot], *width))
            .collect::<IbmResult<String>>()?;
        *counts.entry(key).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Kraus operators from the `kraus_operators` option: a list of 2x2
/// matrices whose entries are numbers or `[re, im]` pairs.
pub fn kraus_from_value(value: &Value) -> IbmResult<Vec<Array2<Complex64>>> {
    let invalid = |message: String| IbmError::InvalidOption {
        key: "kraus_operators".into(),
        message,
    };
    let matrices: Vec<Vec<Vec<Value>>> =
        serde_json::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;

    matrices
        .into_iter()
        .map(|rows| {
            let nrows = rows.len();
            let ncols = rows.first().map_or(0, Vec::len);
            let entries = rows
                .into_iter()
                .flatten()
                .map(|entry| match entry {
                    Value::Number(n) => n
                        .as_f64()
                        .map(|re| Complex64::new(re, 0.0))
                        .ok_or_else(|| invalid(format!("bad entry {n}"))),
                    Value::Array(pair) => match pair.as_slice() {
                        [re, im] => match (re.as_f64(), im.as_f64()) {
                            (Some(re), Some(im)) => Ok(Complex64::new(re, im)),
                            _ => Err(invalid(format!("bad entry {pair:?}"))),
                        },
                        _ => Err(invalid(format!("bad entry {pair:?}"))),
                    },
                    other => Err(invalid(format!("bad entry {other}"))),
                })
                .collect::<IbmResult<Vec<Complex64>>>()?;
            Array2::from_shape_vec((nrows, ncols), entries)
                .map_err(|_| invalid("rows of different lengths".into()))
        })
        .collect()
}

impl fmt::Debug for QiskitClientBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("QiskitClientBackend");
        s.field("provider", &self.provider)
            .field("optimization_level", &self.optimization_level)
            .field("transpile", &self.transpile);
        if let Engine::Remote { client, backend, .. } = &self.engine {
            s.field("client", client).field("backend", backend);
        }
        s.finish()
    }
}

#[async_trait]
impl ClientBackend for QiskitClientBackend {
    fn name(&self) -> &str {
        "qiskit-client"
    }

    #[instrument(skip(self, circuit, options), fields(provider = %self.provider))]
    async fn execute(
        &self,
        circuit: &Circuit,
        shots: u32,
        options: &ExecuteOptions,
    ) -> HalResult<MeasurementOutcome> {
        check_preconditions(circuit, shots, options)?;
        if let Some(transpile) = &self.transpile {
            transpile.check(circuit)?;
        }

        match &self.engine {
            Engine::Local(sim) => self.run_local(sim, circuit, shots),
            Engine::Remote {
                client,
                backend,
                poller,
            } => {
                self.run_remote(client, backend, poller, circuit, shots, options)
                    .await
            }
        }
    }
}

#[async_trait]
impl ClientFactory for QiskitClientBackend {
    async fn from_config(config: &ClientConfig, credentials: &CredentialSource) -> HalResult<Self> {
        let provider = Provider::parse(config.provider.as_deref())?;
        let backend = match provider {
            Provider::BasicSimulator => Self::basic_simulator(),
            Provider::AerSimulator => {
                let kraus = config
                    .extra
                    .get("kraus_operators")
                    .map(kraus_from_value)
                    .transpose()?;
                let noise = NoiseModel::from_settings(
                    config.noise_type.as_deref(),
                    config.noise_level,
                    kraus,
                )?;
                Self::aer_simulator(noise)
            }
            Provider::IbmQ => {
                let token_provider =
                    EnvTokenProvider::with_source(IBM_TOKEN_VAR, credentials.clone());
                let token = resolve_token(config.token.as_deref(), &token_provider)?;
                let platform = config.platform.clone().ok_or(IbmError::MissingPlatform)?;
                let endpoint = config
                    .endpoint
                    .clone()
                    .or_else(|| credentials.get(ENDPOINT_VAR))
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
                let instance = config
                    .project
                    .clone()
                    .or_else(|| credentials.get(INSTANCE_VAR));
                let client = IbmClient::new(endpoint, &token, instance)?;
                Self::remote(client, platform).with_verbosity(config.verbose)
            }
        };

        let level = validate_optimization_level(
            config.optimization_level.unwrap_or(DEFAULT_OPTIMIZATION_LEVEL),
        )?;
        let mut backend = backend.with_optimization_level(level)?;
        if let Some(transpile) = TranspileOptions::from_extra(&config.extra, level)? {
            backend = backend.with_transpile_options(transpile);
        }
        debug!("qiskit client on {} ({})", backend.platform(), provider);
        Ok(backend)
    }
}
