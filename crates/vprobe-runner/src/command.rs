//! Build and run the probe invocation.

use crate::error::RunnerError;
use crate::interpreter::Interpreter;
use crate::Result;
use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

// ─── Command builder ──────────────────────────────────────────────────────

/// `<interpreter> <entrypoint> <args…>` with the forwarded env applied and
/// the project root as working directory. Stdin is closed; stdout and stderr
/// stay inherited so the probe's own output streams straight through.
pub fn probe_command(
    interp: &Interpreter,
    entrypoint: &Path,
    args: &[String],
    env: &HashMap<String, String>,
    cwd: &Path,
) -> Command {
    let mut cmd = interp.command();
    cmd.arg(entrypoint);
    cmd.args(args);
    for (k, v) in env {
        cmd.env(k, v);
    }
    cmd.current_dir(cwd);
    cmd.stdin(Stdio::null());
    cmd
}

/// The exact command line as a display string, for `--dry-run` output.
pub fn render(interp: &Interpreter, entrypoint: &Path, args: &[String]) -> String {
    let mut parts = interp.argv_prefix();
    parts.push(entrypoint.display().to_string());
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

// ─── Execution ────────────────────────────────────────────────────────────

/// Spawn the probe and wait for it, returning the child's [`ExitStatus`]
/// untouched. Callers decide what a non-success status means.
pub fn run(
    interp: &Interpreter,
    entrypoint: &Path,
    args: &[String],
    env: &HashMap<String, String>,
    cwd: &Path,
) -> Result<ExitStatus> {
    if !entrypoint.exists() {
        return Err(RunnerError::EntrypointNotFound(entrypoint.to_path_buf()));
    }
    tracing::info!(command = %render(interp, entrypoint, args), "launching probe");
    probe_command(interp, entrypoint, args, env, cwd)
        .status()
        .map_err(|e| RunnerError::Spawn(e.to_string()))
}

// ─── Tests ────────────────────────────────────────────────────────────────
