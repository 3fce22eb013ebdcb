//! qcloud circuit representation
//!
//! Backend-neutral gates and circuits that every qcloud client translates into
//! its provider's native format.
//!
//! # Core Components
//!
//! - [`QubitId`]: qubit index within a circuit
//! - [`GateKind`] / [`Gate`]: the closed gate set and a validated gate instance
//! - [`Instruction`]: queue entry, either a gate or a measurement register
//! - [`Circuit`]: fixed-width builder with terminal measurements
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qcloud_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cnot(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure([QubitId(0), QubitId(1)]).unwrap();
//!
//! assert_eq!(circuit.gate_count(), 2);
//! assert_eq!(circuit.measurements().next().unwrap().name(), "register0");
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Parameters |
//! |------|--------|------------|
//! | `I`, `X`, `Y`, `Z`, `H` | 1 | – |
//! | `S`, `Sdg`, `T`, `Tdg`, `SX`, `SXdg` | 1 | – |
//! | `Rx`, `Ry`, `Rz` | 1 | θ |
//! | `GPI`, `GPI2` | 1 | φ |
//! | `PRX` | 1 | θ, φ |
//! | `U3` | 1 | θ, φ, λ |
//! | `CNOT`, `CY`, `CZ`, `CSX` | 2 | – |
//! | `CRx`, `CRy`, `CRz`, `CU1` | 2 | θ |
//! | `Swap`, `ISwap`, `FSwap`, `ECR` | 2 | – |
//! | `RXX`, `RYY`, `RZZ`, `RXXYY` | 2 | θ |
//! | `MS` | 2 | φ0, φ1, θ |
//! | `Toffoli` | 3 | – |
//! | `Unitary` | n | 2^n × 2^n matrix |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, UnitaryMatrix};
pub use instruction::{Instruction, MeasurementRegister};
pub use qubit::QubitId;
