//! qcloud Adapter for Amazon Braket
//!
//! Two clients share one set of devices:
//!
//! - [`BraketClientBackend`] (`braket-client`) translates every gate through
//!   [`translate_gate`] into a [`BraketCircuit`]
//! - [`AwsClientBackend`] (`aws-client`) emits OpenQASM 2 and rewrites it
//!   token by token into the Braket vocabulary
//!
//! # Gate Mapping
//!
//! | qcloud | Braket | Parameters |
//! |--------|--------|------------|
//! | `sdg`, `tdg` | `Si`, `Ti` | |
//! | `sx`, `sxdg` | `V`, `Vi` | |
//! | `cx`, `csx`, `ccx` | `CNot`, `CV`, `CCNot` | |
//! | `rxx`, `ryy`, `rzz` | `XX`, `YY`, `ZZ` | θ |
//! | `rxxyy` | `XY` | −θ |
//! | `u3` | `U` | (θ, φ, λ) |
//!
//! `crx`, `cry`, `crz`, `cu1` and `fswap` have no Braket equivalent.
//!
//! # Devices
//!
//! | Selector | Device |
//! |----------|--------|
//! | unset, `local` | in-process [`LocalSimulator`] |
//! | `sv1`, `dm1`, `tn1` | Amazon managed simulators |
//! | `ionq`, `forte`, `rigetti`, `garnet` | QPUs |
//! | `arn:aws:braket:...` | any device by ARN |
//!
//! Remote devices load AWS credentials from the standard chain and need:
//! - `QCLOUD_BRAKET_S3_BUCKET`: S3 bucket for task results
//!
//! Optional:
//! - `QCLOUD_BRAKET_S3_PREFIX`: S3 key prefix (default: `"qcloud-results"`)
//! - `AWS_REGION`: AWS region (default: `"us-east-1"`)
//!
//! # Example
//!
//! ```no_run
//! use qcloud_adapter_braket::BraketClientBackend;
//! use qcloud_hal::{ClientBackend, ExecuteOptions};
//! use qcloud_ir::Circuit;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = BraketClientBackend::local();
//! let outcome = backend
//!     .execute(&Circuit::bell()?, 1000, &ExecuteOptions::new().with_verbatim(true))
//!     .await?;
//! println!("{:?}", outcome.frequencies());
//! # Ok(())
//! # }
//! ```

mod api;
mod aws;
mod backend;
mod circuit;
pub mod device;
mod error;
mod gate;
mod local;
mod task;
mod translate;

pub use api::{BraketSettings, REGION_VAR, S3_BUCKET_VAR, S3_PREFIX_VAR};
pub use aws::AwsDevice;
pub use backend::{AwsClientBackend, BraketClientBackend, bridge_source};
pub use circuit::{BraketCircuit, BraketInstruction, BraketOp};
pub use device::DeviceSpec;
pub use error::{BraketError, BraketResult};
pub use gate::BraketGate;
pub use local::LocalSimulator;
pub use task::{BraketDevice, BraketProgram, QuantumTask, TaskResult, TaskStatus};
pub use translate::{to_braket, translate_gate};
