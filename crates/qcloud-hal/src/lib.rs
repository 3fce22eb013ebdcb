//! qcloud Hardware Abstraction Layer
//!
//! The contract every cloud client implements, plus the pieces they share:
//!
//! - [`ClientBackend`]: `execute(circuit, shots, options)` resolving to a
//!   [`MeasurementOutcome`] once the provider job is terminal
//! - [`ClientConfig`] / [`ExecuteOptions`]: construction-time and per-call settings
//! - [`Poller`]: fixed-interval status polling without a retry bound
//! - [`CredentialSource`] / [`EnvTokenProvider`]: explicit token or named variable
//! - [`check_preconditions`]: checks run before any conversion or device call
//!
//! # Supported Clients
//!
//! | Client | Crate | Credentials |
//! |--------|-------|-------------|
//! | `braket-client` | `qcloud-adapter-braket` | AWS default chain (remote devices only) |
//! | `aws-client` | `qcloud-adapter-braket` | AWS default chain (remote devices only) |
//! | `qibo-client` | `qcloud-adapter-qibo` | `QIBO_CLIENT_TOKEN` |
//! | `ionq-client` | `qcloud-adapter-ionq` | `IONQ_TOKEN` |
//! | `qiskit-client` | `qcloud-adapter-ibm` | `IBM_QUANTUM_TOKEN` (remote provider only) |
//!
//! # Implementing a Client
//!
//! ```ignore
//! use async_trait::async_trait;
//! use qcloud_hal::{ClientBackend, ExecuteOptions, HalResult, MeasurementOutcome, check_preconditions};
//! use qcloud_ir::Circuit;
//!
//! struct MyClient;
//!
//! #[async_trait]
//! impl ClientBackend for MyClient {
//!     fn name(&self) -> &str {
//!         "my-client"
//!     }
//!
//!     async fn execute(
//!         &self,
//!         circuit: &Circuit,
//!         shots: u32,
//!         options: &ExecuteOptions,
//!     ) -> HalResult<MeasurementOutcome> {
//!         check_preconditions(circuit, shots, options)?;
//!         // convert, submit, poll, collect
//!         todo!()
//!     }
//! }
//! ```

pub mod auth;
pub mod backend;
pub mod error;
pub mod job;
pub mod result;

pub use auth::{CredentialSource, EnvTokenProvider, TokenProvider, resolve_token};
pub use backend::{
    ClientBackend, ClientConfig, ClientFactory, DEFAULT_SHOTS, ExecuteOptions, check_preconditions,
};
pub use error::{HalError, HalResult};
pub use job::{DEFAULT_POLL_INTERVAL, Job, JobId, JobStatus, Poller};
pub use result::{Counts, MAX_MARGINAL_QUBITS, MeasurementOutcome, samples_from_counts};
