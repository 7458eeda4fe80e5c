//! Credential resolution for the downstream program.
//!
//! Two variables matter: `GEMINI_API_KEY` (the agent key, hard-required by
//! agent-backed runs) and `HF_TOKEN` (Hugging Face hub token, soft — gated
//! model downloads fail without it, so its absence is a warning). `HF_TOKEN`
//! additionally falls back to the token file written by
//! `huggingface-cli login`.

use crate::error::{ProbeError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const HF_TOKEN: &str = "HF_TOKEN";

/// Every credential the downstream program understands.
pub const KNOWN: &[&str] = &[HF_TOKEN, GEMINI_API_KEY];

/// Resolve a credential from the process environment, falling back to the
/// Hugging Face CLI token file for `HF_TOKEN`. Blank values count as unset.
pub fn resolve(name: &str) -> Option<String> {
    if let Some(v) = std::env::var(name).ok().and_then(normalize) {
        return Some(v);
    }
    if name == HF_TOKEN {
        return hf_token_from_disk();
    }
    None
}

/// Like [`resolve`], but failing with an error naming the variable. Callers
/// gate on this before any subprocess is spawned.
pub fn require(name: &str) -> Result<String> {
    resolve(name).ok_or_else(|| ProbeError::MissingCredential(name.to_string()))
}

/// The env map forwarded to the probe subprocess. Explicit forwarding means a
/// token resolved from a fallback file still reaches the child.
pub fn forwarded() -> HashMap<String, String> {
    let mut env = HashMap::new();
    for name in KNOWN {
        match resolve(name) {
            Some(value) => {
                env.insert((*name).to_string(), value);
            }
            None if *name == HF_TOKEN => {
                tracing::warn!("HF_TOKEN is not set; gated model downloads may fail");
            }
            None => {}
        }
    }
    env
}

/// Token file candidates written by `huggingface-cli login`, current
/// location first, then the legacy one.
fn hf_token_candidates() -> Option<Vec<PathBuf>> {
    let home = home::home_dir()?;
    Some(vec![
        home.join(".cache/huggingface/token"),
        home.join(".huggingface/token"),
    ])
}

fn hf_token_from_disk() -> Option<String> {
    read_token_file(&hf_token_candidates()?)
}

fn read_token_file(candidates: &[PathBuf]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|p| std::fs::read_to_string(p).ok())
        .find_map(normalize)
}

fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn normalize_drops_blank_values() {
        assert_eq!(normalize("  ".to_string()), None);
        assert_eq!(normalize("".to_string()), None);
        assert_eq!(normalize(" tok \n".to_string()), Some("tok".to_string()));
    }

    #[test]
    fn token_file_first_candidate_wins() {
        let dir = TempDir::new().unwrap();
        let current = dir.path().join("token");
        let legacy = dir.path().join("legacy-token");
        std::fs::write(&current, "hf_current\n").unwrap();
        std::fs::write(&legacy, "hf_legacy\n").unwrap();
        let got = read_token_file(&[current, legacy]);
        assert_eq!(got, Some("hf_current".to_string()));
    }

    #[test]
    fn token_file_skips_missing_and_blank() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let blank = dir.path().join("blank");
        let good = dir.path().join("good");
        std::fs::write(&blank, "\n").unwrap();
        std::fs::write(&good, "hf_abc123").unwrap();
        let got = read_token_file(&[missing, blank, good]);
        assert_eq!(got, Some("hf_abc123".to_string()));
    }

    #[test]
    fn token_file_none_when_nothing_usable() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_token_file(&[dir.path().join("nope")]), None);
    }
}
