//! Python launcher detection.
//!
//! # Priority
//! 1. conda   — `conda run -n <env> python`, the provisioned environment
//! 2. python3 — system interpreter
//! 3. python  — legacy fallback
//!
//! A `python.bin` value in the config bypasses detection entirely; the
//! configured binary is invoked as-is.

use crate::error::RunnerError;
use crate::Result;
use std::process::Command;

// ─── Interpreter ──────────────────────────────────────────────────────────

/// How the downstream Python entrypoint gets launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpreter {
    /// `conda run -n <env> python` inside the provisioned environment.
    Conda { env: String },
    Python3,
    Python,
    /// Explicit binary from `python.bin`; detection skipped.
    Explicit(String),
}

impl Interpreter {
    /// The launcher argv, before the entrypoint and probe args are appended.
    pub fn argv_prefix(&self) -> Vec<String> {
        match self {
            Interpreter::Conda { env } => vec![
                "conda".to_string(),
                "run".to_string(),
                "--no-capture-output".to_string(),
                "-n".to_string(),
                env.clone(),
                "python".to_string(),
            ],
            Interpreter::Python3 => vec!["python3".to_string()],
            Interpreter::Python => vec!["python".to_string()],
            Interpreter::Explicit(bin) => vec![bin.clone()],
        }
    }

    /// A bare [`Command`] for this launcher.
    pub fn command(&self) -> Command {
        let prefix = self.argv_prefix();
        let mut cmd = Command::new(&prefix[0]);
        cmd.args(&prefix[1..]);
        cmd
    }

    pub fn describe(&self) -> String {
        match self {
            Interpreter::Conda { env } => format!("conda run (env '{env}')"),
            Interpreter::Python3 => "python3".to_string(),
            Interpreter::Python => "python".to_string(),
            Interpreter::Explicit(bin) => bin.clone(),
        }
    }
}

// ─── Detection ────────────────────────────────────────────────────────────

/// Probe PATH for the best available launcher.
pub fn detect(conda_env: &str) -> Result<Interpreter> {
    if which::which("conda").is_ok() {
        return Ok(Interpreter::Conda {
            env: conda_env.to_string(),
        });
    }
    if which::which("python3").is_ok() {
        return Ok(Interpreter::Python3);
    }
    if which::which("python").is_ok() {
        return Ok(Interpreter::Python);
    }
    Err(RunnerError::NoInterpreter)
}

/// Honor an explicit `python.bin` override, falling back to detection.
pub fn select(bin: Option<&str>, conda_env: &str) -> Result<Interpreter> {
    match bin {
        Some(bin) => Ok(Interpreter::Explicit(bin.to_string())),
        None => {
            let interp = detect(conda_env)?;
            tracing::debug!(interpreter = %interp.describe(), "selected python launcher");
            Ok(interp)
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let interp = select(Some("/opt/py/bin/python"), "vprobe").unwrap();
        assert_eq!(interp, Interpreter::Explicit("/opt/py/bin/python".to_string()));
    }

    #[test]
    fn conda_prefix_names_the_env() {
        let interp = Interpreter::Conda {
            env: "vprobe".to_string(),
        };
        assert_eq!(
            interp.argv_prefix(),
            vec!["conda", "run", "--no-capture-output", "-n", "vprobe", "python"]
        );
    }

    #[test]
    fn command_program_matches_prefix() {
        let interp = Interpreter::Explicit("/bin/sh".to_string());
        assert_eq!(interp.command().get_program(), "/bin/sh");
        assert_eq!(Interpreter::Python3.command().get_program(), "python3");
    }

    #[test]
    fn detect_does_not_panic() {
        // Which launcher wins depends on the test environment.
        let _ = detect("vprobe");
    }
}
