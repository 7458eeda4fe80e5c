use anyhow::Context;
use std::path::Path;
use vprobe_core::config::Config;
use vprobe_core::experiment::{ModelFamily, RunOverrides, RunSpec};
use vprobe_core::env;

use crate::cmd;

/// Run every family in the fixed order resnet, dino, clip. Strictly
/// sequential and fail-fast: the first non-success run aborts the suite and
/// its exit code becomes the process exit code.
pub fn run(root: &Path, dry_run: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    let specs: Vec<RunSpec> = ModelFamily::all()
        .iter()
        .map(|family| RunSpec::resolve(*family, &config, &RunOverrides::default()))
        .collect();

    // Gate on every member's credentials before the first run starts, so a
    // missing key can't waste a completed resnet pass.
    if !dry_run {
        for spec in &specs {
            for name in spec.required_credentials() {
                env::require(name)?;
            }
        }
    }

    for spec in &specs {
        if !dry_run {
            eprintln!("==> {}", spec.family);
        }
        cmd::run::execute(root, &config, spec, dry_run)?;
    }

    Ok(())
}
