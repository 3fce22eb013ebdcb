//! qcloud: run quantum circuits on cloud providers through one interface.
//!
//! Every client is picked by name and returns a [`ClientBackend`] whose
//! `execute` resolves to a [`MeasurementOutcome`]:
//!
//! | Name | Provider |
//! |------|----------|
//! | `qibo-client` | Qibo cloud |
//! | `qiskit-client` | Local reference simulators or IBM Quantum |
//! | `braket-client` | Amazon Braket, native program conversion |
//! | `aws-client` | Amazon Braket, OpenQASM bridge |
//! | `ionq-client` | IonQ cloud |
//!
//! # Example
//!
//! ```no_run
//! use qcloud::{Circuit, ClientConfig, ExecuteOptions, QubitId};
//!
//! # async fn run() -> qcloud::HalResult<()> {
//! let mut circuit = Circuit::new(2);
//! circuit.h(QubitId(0))?.cnot(QubitId(0), QubitId(1))?;
//! circuit.measure_all()?;
//!
//! let client = qcloud::load("braket-client", None, &ClientConfig::new()).await?;
//! let outcome = client.execute(&circuit, 1000, &ExecuteOptions::new()).await?;
//! println!("{:?}", outcome.frequencies());
//! # Ok(())
//! # }
//! ```
//!
//! Synchronous callers use [`blocking`].

pub mod blocking;
mod client;

pub use client::{ClientName, list_available, load, load_with};

pub use qcloud_hal::{
    ClientBackend, ClientConfig, Counts, CredentialSource, DEFAULT_SHOTS, ExecuteOptions,
    HalError, HalResult, MeasurementOutcome,
};
pub use qcloud_ir::{Circuit, MeasurementRegister, QubitId};
