//! Translate command implementation.
//!
//! Prints what a Braket client would submit, without contacting a device.

use anyhow::Result;

use qcloud_adapter_braket::{bridge_source, to_braket};

use super::common::load_circuit;

/// Output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dialect {
    /// Structured translation, as submitted by `braket-client`.
    Braket,
    /// Textual bridge, as submitted by `aws-client`.
    Aws,
}

/// The program text for `source` in `dialect`.
pub fn render(circuit: &qcloud::Circuit, dialect: Dialect, verbatim: bool) -> Result<String> {
    Ok(match dialect {
        Dialect::Braket => to_braket(circuit, verbatim)?.to_openqasm(),
        Dialect::Aws => bridge_source(circuit, verbatim)?,
    })
}

/// Execute the translate command.
pub fn execute(input: &str, dialect: Dialect, verbatim: bool) -> Result<()> {
    let circuit = load_circuit(input)?;
    print!("{}", render(&circuit, dialect, verbatim)?);
    Ok(())
}
