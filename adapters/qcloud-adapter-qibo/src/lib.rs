//! qcloud Adapter for the qibo cloud
//!
//! [`QiboClientBackend`] (`qibo-client`) sends circuits in qibo's raw JSON
//! form to the qibo cloud, polls the job and returns its samples.
//!
//! # Configuration
//!
//! | Setting | Default | Source |
//! |---------|---------|--------|
//! | token | none | explicit, then `QIBO_CLIENT_TOKEN` |
//! | project | `personal` | `ClientConfig::project` |
//! | platform | `k2` | `ClientConfig::platform` |
//! | endpoint | `https://cloud.qibo.science` | `ClientConfig::endpoint`, then `QCLOUD_QIBO_URL` |
//!
//! `verbatim` is forwarded to the service, which then skips transpilation.

mod api;
mod backend;
mod error;
mod serialize;

pub use api::{BASE_URL, ENDPOINT_VAR, JobInfo, JobRequest, JobResult, QiboClient};
pub use backend::{DEFAULT_PLATFORM, DEFAULT_PROJECT, QiboClientBackend};
pub use error::{QiboError, QiboResult};
pub use serialize::{RawCircuit, RawGate, to_raw};
