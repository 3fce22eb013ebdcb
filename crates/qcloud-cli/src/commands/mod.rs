//! CLI command implementations.

pub mod clients;
pub mod common;
pub mod run;
pub mod translate;
pub mod version;
