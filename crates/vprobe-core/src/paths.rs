use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory and file constants
// ---------------------------------------------------------------------------

pub const VPROBE_DIR: &str = ".vprobe";
pub const CONFIG_FILE: &str = ".vprobe/config.yaml";
pub const HISTORY_FILE: &str = ".vprobe/history.yaml";

/// Conda environment description consumed by `conda env update`.
pub const ENVIRONMENT_FILE: &str = "environment.yml";
/// Pip requirements installed into the conda environment.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

pub const DEFAULT_ENTRYPOINT: &str = "main.py";
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_RESULTS_DIR: &str = "results";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn vprobe_dir(root: &Path) -> PathBuf {
    root.join(VPROBE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn history_path(root: &Path) -> PathBuf {
    root.join(HISTORY_FILE)
}

pub fn environment_file(root: &Path) -> PathBuf {
    root.join(ENVIRONMENT_FILE)
}

pub fn requirements_file(root: &Path) -> PathBuf {
    root.join(REQUIREMENTS_FILE)
}

/// Resolve the downstream entrypoint (`main.py` by default) against the
/// project root. Absolute paths are passed through unchanged.
pub fn entrypoint_path(root: &Path, entrypoint: &str) -> PathBuf {
    let p = Path::new(entrypoint);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
