//! `vprobe-runner` — how a resolved run spec becomes a child process.
//!
//! ```text
//! RunSpec::argv()
//!     │
//!     ▼
//! Interpreter     ← conda run > python3 > python, or the configured binary
//!     │
//!     ▼
//! probe command   ← <interpreter> <entrypoint> <argv…>, stdio streamed through
//!     │
//!     ▼
//! ExitStatus      ← propagated verbatim to the caller
//! ```
//!
//! Also home to the environment-setup sequence (`setup`), which provisions
//! the conda environment and pip dependencies the entrypoint expects.

pub mod command;
pub mod error;
pub mod interpreter;
pub mod setup;

pub use command::{probe_command, render, run};
pub use error::RunnerError;
pub use interpreter::Interpreter;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, RunnerError>;
