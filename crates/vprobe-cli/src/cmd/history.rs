use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use vprobe_core::history;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let history = history::load(root).context("failed to load run history")?;

    if json {
        return print_json(&history.runs);
    }

    if history.runs.is_empty() {
        println!("No runs recorded yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = history
        .runs
        .iter()
        .map(|r| {
            vec![
                r.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.family.clone(),
                r.exit_code.to_string(),
                format!("{}ms", r.duration_ms),
            ]
        })
        .collect();

    print_table(&["STARTED", "FAMILY", "EXIT", "DURATION"], &rows);
    Ok(())
}
