//! Synchronous wrappers.
//!
//! Each call builds a current-thread runtime and drives one future to
//! completion, so these functions must not be called from inside a tokio
//! runtime.

use std::collections::BTreeMap;
use std::future::Future;

use qcloud_hal::{
    ClientBackend, ClientConfig, CredentialSource, ExecuteOptions, HalError, HalResult,
    MeasurementOutcome,
};
use qcloud_ir::Circuit;

fn block_on<F: Future>(future: F) -> HalResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| HalError::Backend(format!("failed to start runtime: {e}")))?;
    Ok(runtime.block_on(future))
}

/// Blocking [`crate::load`].
pub fn load(
    name: &str,
    token: Option<&str>,
    config: &ClientConfig,
) -> HalResult<Box<dyn ClientBackend>> {
    block_on(crate::load(name, token, config))?
}

/// Blocking [`crate::list_available`].
pub fn list_available(credentials: &CredentialSource) -> HalResult<BTreeMap<String, bool>> {
    block_on(crate::list_available(credentials))
}

/// Run one circuit and wait for its outcome.
pub fn execute(
    backend: &dyn ClientBackend,
    circuit: &Circuit,
    shots: u32,
    options: &ExecuteOptions,
) -> HalResult<MeasurementOutcome> {
    block_on(backend.execute(circuit, shots, options))?
}
