use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use vprobe_core::config::Config;
use vprobe_core::experiment::{ModelFamily, RunOverrides, RunSpec};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    let specs: Vec<RunSpec> = ModelFamily::all()
        .iter()
        .map(|family| RunSpec::resolve(*family, &config, &RunOverrides::default()))
        .collect();

    if json {
        return print_json(&specs);
    }

    let rows: Vec<Vec<String>> = specs
        .iter()
        .map(|s| {
            let units = s
                .units
                .iter()
                .map(|u| u.to_string())
                .collect::<Vec<_>>()
                .join(",");
            vec![
                s.family.to_string(),
                s.agent.clone(),
                s.unit_mode.to_string(),
                units,
                s.path2prompts.clone(),
                s.path2save.clone(),
            ]
        })
        .collect();

    print_table(
        &["FAMILY", "AGENT", "UNIT MODE", "UNITS", "PROMPTS", "SAVE"],
        &rows,
    );
    Ok(())
}
