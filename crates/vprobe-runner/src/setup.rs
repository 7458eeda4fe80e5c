//! Environment provisioning: the conda / pip sequence that prepares the
//! interpreter the probe entrypoint runs under.

use crate::error::RunnerError;
use crate::Result;
use std::path::Path;
use std::process::Command;
use vprobe_core::config::Config;
use vprobe_core::paths;

/// One composed provisioning command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStep {
    pub description: &'static str,
    pub argv: Vec<String>,
}

impl SetupStep {
    fn new(description: &'static str, argv: &[&str]) -> Self {
        Self {
            description,
            argv: argv.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

/// Compose the provisioning sequence for this project root.
///
/// With an `environment.yml` present, the conda env is updated from it;
/// otherwise a bare env is created. A `requirements.txt` adds a pip install
/// inside the env.
pub fn plan(root: &Path, config: &Config) -> Vec<SetupStep> {
    let env = config.python.conda_env.as_str();
    let mut steps = Vec::new();

    if paths::environment_file(root).exists() {
        steps.push(SetupStep::new(
            "update conda environment",
            &[
                "conda",
                "env",
                "update",
                "--name",
                env,
                "--file",
                paths::ENVIRONMENT_FILE,
                "--prune",
            ],
        ));
    } else {
        steps.push(SetupStep::new(
            "create conda environment",
            &["conda", "create", "-y", "--name", env, "python=3.11"],
        ));
    }

    if paths::requirements_file(root).exists() {
        steps.push(SetupStep::new(
            "install pip requirements",
            &[
                "conda",
                "run",
                "-n",
                env,
                "python",
                "-m",
                "pip",
                "install",
                "-r",
                paths::REQUIREMENTS_FILE,
            ],
        ));
    }

    steps
}

/// Run the provisioning sequence, fail-fast. Refuses to start when conda is
/// not on PATH.
pub fn run(root: &Path, config: &Config) -> Result<()> {
    which::which("conda").map_err(|_| RunnerError::CondaNotInstalled)?;

    for step in plan(root, config) {
        tracing::info!("{}: {}", step.description, step.command_line());
        let status = Command::new(&step.argv[0])
            .args(&step.argv[1..])
            .current_dir(root)
            .status()
            .map_err(|e| RunnerError::Spawn(e.to_string()))?;
        if !status.success() {
            return Err(RunnerError::SetupStepFailed {
                step: step.description.to_string(),
                code: status.code().unwrap_or(1),
            });
        }
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bare_root_creates_env() {
        let dir = TempDir::new().unwrap();
        let steps = plan(dir.path(), &Config::default());
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].command_line(),
            "conda create -y --name vprobe python=3.11"
        );
    }

    #[test]
    fn environment_file_switches_to_update() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("environment.yml"), "name: vprobe\n").unwrap();
        let steps = plan(dir.path(), &Config::default());
        assert_eq!(
            steps[0].command_line(),
            "conda env update --name vprobe --file environment.yml --prune"
        );
    }

    #[test]
    fn requirements_add_pip_install_inside_env() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "torch\n").unwrap();
        let steps = plan(dir.path(), &Config::default());
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[1].command_line(),
            "conda run -n vprobe python -m pip install -r requirements.txt"
        );
    }

    #[test]
    fn conda_env_name_comes_from_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.python.conda_env = "hw-probe".to_string();
        let steps = plan(dir.path(), &config);
        assert!(steps[0].command_line().contains("--name hw-probe"));
    }
}
