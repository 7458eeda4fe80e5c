use anyhow::Context;
use std::path::Path;
use vprobe_core::config::Config;
use vprobe_core::{env, io};
use vprobe_runner::setup;

pub fn run(root: &Path, dry_run: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    if dry_run {
        for step in setup::plan(root, &config) {
            println!("{}", step.command_line());
        }
        return Ok(());
    }

    setup::run(root, &config)?;

    // Probe results never belong in version control.
    io::ensure_gitignore_entry(root, &config.results_dir)?;

    eprintln!("Environment ready. Credential status:");
    for name in env::KNOWN {
        match env::resolve(name) {
            Some(_) => eprintln!("  \u{2713} {name}"),
            None => eprintln!("  \u{2717} {name} (not set)"),
        }
    }

    Ok(())
}
