use anyhow::Context;
use chrono::Utc;
use clap::Args;
use std::path::Path;
use std::time::Instant;
use vprobe_core::config::Config;
use vprobe_core::experiment::{ModelFamily, RunOverrides, RunSpec, UnitMode, UnitSpec};
use vprobe_core::{env, history, paths};
use vprobe_runner::{command as runner, interpreter};

// ---------------------------------------------------------------------------
// RunExit — typed non-zero exit codes (no std::process::exit in command code)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum RunExit {
    ProbeFailed(i32),
}

impl RunExit {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunExit::ProbeFailed(c) => *c,
        }
    }
}

impl std::fmt::Display for RunExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunExit::ProbeFailed(code) => {
                write!(f, "probe subprocess exited with code {code}")
            }
        }
    }
}

impl std::error::Error for RunExit {}

// ---------------------------------------------------------------------------
// RunArgs
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RunArgs {
    /// Agent identifier forwarded as --agent
    #[arg(long)]
    pub agent: Option<String>,

    /// Unit selection mode forwarded as --unit_mode: all, random, or manual
    #[arg(long)]
    pub unit_mode: Option<String>,

    /// Unit to probe (<layer>:<index>); repeat for several, forwarded
    /// comma-joined as --units
    #[arg(long = "unit", value_name = "LAYER:INDEX")]
    pub units: Vec<String>,

    /// Device index forwarded as --device
    #[arg(long)]
    pub device: Option<String>,

    /// Prompt file forwarded as --path2prompts
    #[arg(long)]
    pub path2prompts: Option<String>,

    /// Output location forwarded as --path2save
    #[arg(long)]
    pub path2save: Option<String>,
}

impl RunArgs {
    fn into_overrides(self) -> anyhow::Result<RunOverrides> {
        let unit_mode = self
            .unit_mode
            .as_deref()
            .map(str::parse::<UnitMode>)
            .transpose()?;
        let units = self
            .units
            .iter()
            .map(|s| s.parse::<UnitSpec>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RunOverrides {
            agent: self.agent,
            unit_mode,
            units,
            device: self.device,
            path2prompts: self.path2prompts,
            path2save: self.path2save,
        })
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

pub fn run(root: &Path, family: &str, args: RunArgs, dry_run: bool) -> anyhow::Result<()> {
    let family: ModelFamily = family.parse()?;
    let config = Config::load(root).context("failed to load config")?;
    let spec = RunSpec::resolve(family, &config, &args.into_overrides()?);
    execute(root, &config, &spec, dry_run)
}

/// Shared by `run` and `suite`. The credential gate sits in front of the
/// spawn so a missing key never reaches the downstream program.
pub fn execute(root: &Path, config: &Config, spec: &RunSpec, dry_run: bool) -> anyhow::Result<()> {
    let interp = interpreter::select(config.python.bin.as_deref(), &config.python.conda_env)?;
    let entrypoint = paths::entrypoint_path(root, &config.entrypoint);
    let argv = spec.argv();

    if dry_run {
        println!("{}", runner::render(&interp, &entrypoint, &argv));
        return Ok(());
    }

    for name in spec.required_credentials() {
        env::require(name)?;
    }

    let forwarded = env::forwarded();
    let started_at = Utc::now();
    let timer = Instant::now();
    let status = runner::run(&interp, &entrypoint, &argv, &forwarded, root)?;
    let exit_code = status.code().unwrap_or(1);

    history::append(
        root,
        history::RunRecord {
            family: spec.family.to_string(),
            argv,
            exit_code,
            started_at,
            duration_ms: timer.elapsed().as_millis() as u64,
        },
    )?;

    if !status.success() {
        return Err(RunExit::ProbeFailed(exit_code).into());
    }
    Ok(())
}
