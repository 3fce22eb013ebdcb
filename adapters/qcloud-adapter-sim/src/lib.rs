//! qcloud local statevector simulator
//!
//! Exact statevector simulation used as the reference engine of the
//! workspace: the local Braket device, the qiskit-style local providers and
//! the cross-backend tests all sample from it.
//!
//! # Features
//!
//! - **Every gate kind**: dedicated loops for common gates, a generic
//!   `2^k × 2^k` kernel for the rest (see [`gates::matrix`])
//! - **Exact marginals**: [`SimulatorBackend::probabilities`]
//! - **Trajectory noise**: depolarizing, damping, flip channels or explicit
//!   Kraus operators after every noisy 1-qubit gate
//! - **Reproducible sampling**: [`SimulatorBackend::with_seed`]
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! Noisy runs re-simulate the circuit once per shot.
//!
//! # Example
//!
//! ```no_run
//! use qcloud_adapter_sim::SimulatorBackend;
//! use qcloud_hal::{ClientBackend, ExecuteOptions};
//! use qcloud_ir::Circuit;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SimulatorBackend::new().with_seed(42);
//! let circuit = Circuit::bell()?;
//! let outcome = backend.execute(&circuit, 1000, &ExecuteOptions::new()).await?;
//!
//! // Expect ~50% |00⟩ and ~50% |11⟩
//! println!("{:?}", outcome.frequencies());
//! # Ok(())
//! # }
//! ```

pub mod gates;
pub mod noise;

mod error;
mod simulator;
mod statevector;

pub use error::{SimError, SimResult};
pub use noise::{NOISE_TYPES, NoiseChannel, NoiseModel};
pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend, rows_from_outcomes};
pub use statevector::Statevector;
