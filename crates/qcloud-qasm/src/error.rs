//! Error types for the OpenQASM tooling.

use thiserror::Error;

/// Errors raised while lexing, parsing, rewriting or emitting OpenQASM.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// Lexer error (invalid token).
    #[error("Lexer error at offset {position}: {message}")]
    LexerError { position: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at offset {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Reference to an undeclared register.
    #[error("Undefined register: {0}")]
    UndefinedRegister(String),

    /// Duplicate declaration.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Gate name without a known meaning.
    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: u32,
        size: u32,
    },

    /// Construct the tooling does not handle.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// A rewrite needed a `measure` statement and found none.
    #[error("No measure statement found in the program")]
    MissingMeasurement,

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] qcloud_ir::IrError),
}

/// Result type for OpenQASM operations.
pub type QasmResult<T> = Result<T, QasmError>;
