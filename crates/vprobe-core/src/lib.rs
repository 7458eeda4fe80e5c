//! `vprobe-core` — domain model for vision-unit probing runs.
//!
//! Everything computational (model loading, unit activation probing, prompt
//! evaluation, agent querying) lives in the external Python entrypoint this
//! workspace orchestrates. This crate owns the parts the orchestrator itself
//! is responsible for: the experiment vocabulary (model families, unit specs,
//! run specs and their downstream argument vectors), credential resolution,
//! the optional project config, and the run-history ledger.

pub mod config;
pub mod env;
pub mod error;
pub mod experiment;
pub mod history;
pub mod io;
pub mod paths;

pub use error::{ProbeError, Result};
pub use experiment::{ModelFamily, RunOverrides, RunSpec, UnitMode, UnitSpec};
