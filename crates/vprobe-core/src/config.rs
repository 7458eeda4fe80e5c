use crate::error::Result;
use crate::experiment::{self, ModelFamily, UnitMode, UnitSpec};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// PythonConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonConfig {
    /// Explicit interpreter binary. When set, runtime detection is skipped
    /// and the binary is invoked directly.
    #[serde(default)]
    pub bin: Option<String>,

    /// Conda environment used by `conda run` and the setup sequence.
    #[serde(default = "default_conda_env")]
    pub conda_env: String,
}

fn default_conda_env() -> String {
    "vprobe".to_string()
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            bin: None,
            conda_env: default_conda_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// FamilyConfig
// ---------------------------------------------------------------------------

/// Per-family overrides, keyed by family name under `families:` in the
/// config file. Any field left out falls back to the global default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyConfig {
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub unit_mode: Option<UnitMode>,
    #[serde(default)]
    pub units: Option<Vec<UnitSpec>>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub path2prompts: Option<String>,
    #[serde(default)]
    pub path2save: Option<String>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Project configuration loaded from `.vprobe/config.yaml`. Every field is
/// defaulted, and a missing file yields the defaults, so a bare checkout
/// works without any setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub python: PythonConfig,

    /// Downstream program, resolved against the project root.
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,

    #[serde(default = "default_agent")]
    pub agent: String,

    #[serde(default = "default_device")]
    pub device: String,

    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: String,

    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    #[serde(default)]
    pub families: HashMap<String, FamilyConfig>,
}

fn default_entrypoint() -> String {
    paths::DEFAULT_ENTRYPOINT.to_string()
}

fn default_agent() -> String {
    experiment::DEFAULT_AGENT.to_string()
}

fn default_device() -> String {
    experiment::DEFAULT_DEVICE.to_string()
}

fn default_prompts_dir() -> String {
    paths::DEFAULT_PROMPTS_DIR.to_string()
}

fn default_results_dir() -> String {
    paths::DEFAULT_RESULTS_DIR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python: PythonConfig::default(),
            entrypoint: default_entrypoint(),
            agent: default_agent(),
            device: default_device(),
            prompts_dir: default_prompts_dir(),
            results_dir: default_results_dir(),
            families: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Config> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Check the config for common mistakes. Error-level findings should
    /// block a run; warnings are informational.
    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for name in self.families.keys() {
            if name.parse::<ModelFamily>().is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "unknown model family '{name}' under families: expected resnet, dino, or clip"
                    ),
                });
            }
        }

        if self.python.conda_env.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "python.conda_env is empty".to_string(),
            });
        }

        let entrypoint = paths::entrypoint_path(root, &self.entrypoint);
        if !entrypoint.exists() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("entrypoint not found: {}", entrypoint.display()),
            });
        }

        if !root.join(&self.prompts_dir).is_dir() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("prompts directory not found: {}", self.prompts_dir),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
