//! Qiskit-style client for qcloud
//!
//! One client, `qiskit-client`, over three providers:
//!
//! | Provider | Runs on | Notes |
//! |----------|---------|-------|
//! | `basic_simulator` (default) | local statevector | noiseless |
//! | `aer_simulator` | local trajectories | `noise_type` + `noise_level`, or `kraus_operators` |
//! | `ibm-q` | IBM Quantum runtime | `IBM_QUANTUM_TOKEN`, `platform` names the backend |
//!
//! Local providers load the circuit through OpenQASM 2 with the default
//! register renamed to `meas`. The remote provider submits OpenQASM 3 to
//! the Sampler V2 primitive and converts its hex samples back into rows.
//!
//! Transpilation settings (`native_gates`, `custom_connectivity`,
//! `qubit_map`, `optimization_level`) are checked against each circuit
//! locally and forwarded to the runtime remotely.
//!
//! # Example
//!
//! ```no_run
//! use qcloud_adapter_ibm::QiskitClientBackend;
//! use qcloud_hal::{ClientBackend, ClientConfig, ClientFactory, CredentialSource, ExecuteOptions};
//! use qcloud_ir::Circuit;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new()
//!     .with_provider("aer_simulator")
//!     .with_noise("depolarizing", 0.01);
//! let backend = QiskitClientBackend::from_config(&config, &CredentialSource::Environment).await?;
//! let outcome = backend
//!     .execute(&Circuit::bell()?, 1000, &ExecuteOptions::new())
//!     .await?;
//! println!("{:?}", outcome.frequencies());
//! # Ok(())
//! # }
//! ```

mod api;
mod backend;
mod coupling;
mod error;
mod transpile;

pub use api::{
    ClassicalRegisterData, DEFAULT_ENDPOINT, ENDPOINT_VAR, INSTANCE_VAR, IbmClient, JobResultResponse,
    JobState, JobStatusResponse, SamplerJobRequest, SamplerParams, SamplerResult, SubmitResponse,
};
pub use backend::{
    Provider, QiskitClientBackend, counts_from_sampler, hex_to_binary, kraus_from_value,
};
pub use coupling::CouplingMap;
pub use error::{IbmError, IbmResult};
pub use transpile::{DEFAULT_OPTIMIZATION_LEVEL, TranspileOptions, validate_optimization_level};
