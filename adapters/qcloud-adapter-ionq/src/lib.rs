//! qcloud Adapter for IonQ
//!
//! [`IonQClientBackend`] (`ionq-client`) converts circuits to IonQ's
//! `ionq.circuit.v0` JSON, submits them to the v0.3 REST API and turns the
//! returned probability histogram into shot samples.
//!
//! # Configuration
//!
//! - `IONQ_TOKEN`: API key, unless passed explicitly
//! - `QCLOUD_IONQ_URL`: endpoint override (default: `https://api.ionq.co/v0.3`)
//!
//! The platform defaults to `ionq_simulator`. Extra configuration keys and
//! per-call run options (e.g. `noise`) are forwarded in the job request.
//!
//! # Example
//!
//! ```no_run
//! use qcloud_adapter_ionq::IonQClientBackend;
//! use qcloud_hal::{ClientBackend, ExecuteOptions};
//! use qcloud_ir::Circuit;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = IonQClientBackend::new("my-key", "ionq_simulator")?;
//! let noise = serde_json::json!({"model": "aria-1"});
//! let outcome = backend
//!     .execute(&Circuit::bell()?, 1000, &ExecuteOptions::new().with_run_option("noise", noise))
//!     .await?;
//! println!("{:?}", outcome.frequencies());
//! # Ok(())
//! # }
//! ```

mod api;
mod backend;
mod error;
mod translate;

pub use api::{BASE_URL, ENDPOINT_VAR, Failure, Histogram, IonQClient, JobInfo, JobRequest};
pub use backend::{DEFAULT_PLATFORM, IonQClientBackend, counts_from_histogram, target_for_platform};
pub use error::{IonQError, IonQResult};
pub use translate::{Gateset, IonQCircuit, IonQGate, to_ionq, translate_gate};
