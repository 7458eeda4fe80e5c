//! Append-only ledger of completed probe runs, kept in
//! `.vprobe/history.yaml`. Observational only: run logic never consults it.

use crate::error::Result;
use crate::io;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub family: String,
    pub argv: Vec<String>,
    pub exit_code: i32,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub runs: Vec<RunRecord>,
}

pub fn load(root: &Path) -> Result<History> {
    let path = paths::history_path(root);
    if !path.exists() {
        return Ok(History::default());
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(serde_yaml::from_str(&content)?)
}

pub fn append(root: &Path, record: RunRecord) -> Result<()> {
    let mut history = load(root)?;
    history.runs.push(record);
    let content = serde_yaml::to_string(&history)?;
    io::atomic_write(&paths::history_path(root), content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(family: &str, exit_code: i32) -> RunRecord {
        RunRecord {
            family: family.to_string(),
            argv: vec!["--model".to_string(), family.to_string()],
            exit_code,
            started_at: Utc::now(),
            duration_ms: 1200,
        }
    }

    #[test]
    fn load_empty_when_no_file() {
        let dir = TempDir::new().unwrap();
        assert!(load(dir.path()).unwrap().runs.is_empty());
    }

    #[test]
    fn append_preserves_order() {
        let dir = TempDir::new().unwrap();
        append(dir.path(), record("resnet", 0)).unwrap();
        append(dir.path(), record("dino", 1)).unwrap();
        let history = load(dir.path()).unwrap();
        assert_eq!(history.runs.len(), 2);
        assert_eq!(history.runs[0].family, "resnet");
        assert_eq!(history.runs[1].family, "dino");
        assert_eq!(history.runs[1].exit_code, 1);
    }
}
