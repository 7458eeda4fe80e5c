use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("conda is required but was not found on PATH: install Miniconda or Anaconda first")]
    CondaNotInstalled,

    #[error("no python interpreter found on PATH (tried conda, python3, python)")]
    NoInterpreter,

    #[error("entrypoint not found: {}", .0.display())]
    EntrypointNotFound(PathBuf),

    #[error("failed to spawn probe process: {0}")]
    Spawn(String),

    #[error("setup step '{step}' failed with exit code {code}")]
    SetupStepFailed { step: String, code: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
