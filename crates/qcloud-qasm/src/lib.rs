//! OpenQASM tooling for qcloud
//!
//! - [`emit_qasm2`] / [`emit_qasm3`]: serialise a [`qcloud_ir::Circuit`]
//! - [`rewrite`]: token-level rewrites used by text-based client bridges
//! - [`parse`] / [`parse_program`]: read OpenQASM 2 or Braket OpenQASM 3 back
//!
//! # Example
//!
//! ```rust
//! use qcloud_ir::{Circuit, QubitId};
//! use qcloud_qasm::{emit_qasm2, rewrite};
//!
//! let mut circuit = Circuit::new(1);
//! circuit.sx(QubitId(0)).unwrap();
//! circuit.measure([QubitId(0)]).unwrap();
//!
//! let text = emit_qasm2(&circuit).unwrap();
//! let text = rewrite::strip_include(&text).unwrap();
//! let text = rewrite::rename_gates(&text, rewrite::BRAKET_MNEMONICS).unwrap();
//! assert!(text.contains("\nv q[0];\n"));
//! ```

pub mod ast;
mod emitter;
mod error;
pub mod lexer;
mod parser;
pub mod rewrite;

pub use emitter::{emit_qasm2, emit_qasm3};
pub use error::{QasmError, QasmResult};
pub use parser::{gate_kind, lower_to_circuit, parse, parse_program};
