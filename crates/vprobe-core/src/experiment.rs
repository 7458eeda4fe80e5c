//! The experiment vocabulary: model families, unit specs, and the fully
//! resolved [`RunSpec`] whose [`argv`](RunSpec::argv) is forwarded verbatim
//! to the downstream Python entrypoint.

use crate::config::Config;
use crate::error::ProbeError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Agent identifier forwarded as `--agent` when nothing overrides it.
pub const DEFAULT_AGENT: &str = "gemini-2.5-flash";
/// Device index forwarded as `--device` when nothing overrides it.
pub const DEFAULT_DEVICE: &str = "0";

// ---------------------------------------------------------------------------
// ModelFamily
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    Resnet,
    Dino,
    Clip,
}

impl ModelFamily {
    /// All families, in suite execution order.
    pub fn all() -> &'static [ModelFamily] {
        &[ModelFamily::Resnet, ModelFamily::Dino, ModelFamily::Clip]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelFamily::Resnet => "resnet",
            ModelFamily::Dino => "dino",
            ModelFamily::Clip => "clip",
        }
    }

    /// The unit probed when neither the config nor the command line names one.
    pub fn default_unit(self) -> UnitSpec {
        match self {
            ModelFamily::Resnet => UnitSpec {
                layer: "layer4".to_string(),
                index: 7,
            },
            ModelFamily::Dino => UnitSpec {
                layer: "blocks.11.attn".to_string(),
                index: 3,
            },
            ModelFamily::Clip => UnitSpec {
                layer: "visual.transformer.resblocks.22".to_string(),
                index: 9,
            },
        }
    }

    /// Environment variables a run of this family cannot start without.
    ///
    /// The resnet runner never gated on the agent key, so only dino and clip
    /// refuse to start when it is unset. The key is still forwarded to every
    /// run that has it.
    pub fn required_credentials(self) -> &'static [&'static str] {
        match self {
            ModelFamily::Resnet => &[],
            ModelFamily::Dino | ModelFamily::Clip => &[crate::env::GEMINI_API_KEY],
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelFamily {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resnet" => Ok(ModelFamily::Resnet),
            "dino" => Ok(ModelFamily::Dino),
            "clip" => Ok(ModelFamily::Clip),
            _ => Err(ProbeError::UnknownFamily(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// UnitSpec
// ---------------------------------------------------------------------------

/// One activation unit inside a model: a layer path plus a unit index.
/// Wire form is `<layer>:<index>`, e.g. `layer4:7` or `blocks.11.attn:3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitSpec {
    pub layer: String,
    pub index: u32,
}

static LAYER_RE: OnceLock<Regex> = OnceLock::new();

fn layer_re() -> &'static Regex {
    LAYER_RE.get_or_init(|| Regex::new(r"^[a-z0-9_]+(\.[a-z0-9_]+)*$").unwrap())
}

impl fmt::Display for UnitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.layer, self.index)
    }
}

impl std::str::FromStr for UnitSpec {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((layer, index)) = s.rsplit_once(':') else {
            return Err(ProbeError::InvalidUnitSpec(s.to_string()));
        };
        if !layer_re().is_match(layer) {
            return Err(ProbeError::InvalidUnitSpec(s.to_string()));
        }
        let index: u32 = index
            .parse()
            .map_err(|_| ProbeError::InvalidUnitSpec(s.to_string()))?;
        Ok(UnitSpec {
            layer: layer.to_string(),
            index,
        })
    }
}

impl TryFrom<String> for UnitSpec {
    type Error = ProbeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<UnitSpec> for String {
    fn from(u: UnitSpec) -> String {
        u.to_string()
    }
}

// ---------------------------------------------------------------------------
// UnitMode
// ---------------------------------------------------------------------------

/// How the downstream program selects units: every unit in the layer, a
/// random sample, or exactly the ones listed in `--units`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitMode {
    All,
    Random,
    #[default]
    Manual,
}

impl UnitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitMode::All => "all",
            UnitMode::Random => "random",
            UnitMode::Manual => "manual",
        }
    }
}

impl fmt::Display for UnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitMode {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(UnitMode::All),
            "random" => Ok(UnitMode::Random),
            "manual" => Ok(UnitMode::Manual),
            _ => Err(ProbeError::InvalidUnitMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RunOverrides / RunSpec
// ---------------------------------------------------------------------------

/// Command-line overrides layered on top of config-file values and built-in
/// defaults. `None` / empty means "no override".
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub agent: Option<String>,
    pub unit_mode: Option<UnitMode>,
    pub units: Vec<UnitSpec>,
    pub device: Option<String>,
    pub path2prompts: Option<String>,
    pub path2save: Option<String>,
}

/// A fully resolved experiment invocation. Every field maps onto exactly one
/// downstream flag; values are forwarded verbatim and never rewritten.
#[derive(Debug, Clone, Serialize)]
pub struct RunSpec {
    pub family: ModelFamily,
    pub agent: String,
    pub unit_mode: UnitMode,
    pub units: Vec<UnitSpec>,
    pub device: String,
    pub path2prompts: String,
    pub path2save: String,
}

impl RunSpec {
    /// Layer defaults, config-file values, and CLI overrides (last wins).
    pub fn resolve(family: ModelFamily, config: &Config, ov: &RunOverrides) -> RunSpec {
        let fam = config.families.get(family.as_str());

        let agent = ov
            .agent
            .clone()
            .or_else(|| fam.and_then(|f| f.agent.clone()))
            .unwrap_or_else(|| config.agent.clone());

        let unit_mode = ov
            .unit_mode
            .or_else(|| fam.and_then(|f| f.unit_mode))
            .unwrap_or_default();

        let units = if !ov.units.is_empty() {
            ov.units.clone()
        } else {
            fam.and_then(|f| f.units.clone())
                .unwrap_or_else(|| vec![family.default_unit()])
        };

        let device = ov
            .device
            .clone()
            .or_else(|| fam.and_then(|f| f.device.clone()))
            .unwrap_or_else(|| config.device.clone());

        let path2prompts = ov
            .path2prompts
            .clone()
            .or_else(|| fam.and_then(|f| f.path2prompts.clone()))
            .unwrap_or_else(|| format!("{}/{}.json", config.prompts_dir, family.as_str()));

        let path2save = ov
            .path2save
            .clone()
            .or_else(|| fam.and_then(|f| f.path2save.clone()))
            .unwrap_or_else(|| format!("{}/{}", config.results_dir, family.as_str()));

        RunSpec {
            family,
            agent,
            unit_mode,
            units,
            device,
            path2prompts,
            path2save,
        }
    }

    /// The downstream argument vector, in the documented flag order.
    pub fn argv(&self) -> Vec<String> {
        let units = self
            .units
            .iter()
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join(",");
        vec![
            "--agent".to_string(),
            self.agent.clone(),
            "--model".to_string(),
            self.family.to_string(),
            "--unit_mode".to_string(),
            self.unit_mode.to_string(),
            "--units".to_string(),
            units,
            "--device".to_string(),
            self.device.clone(),
            "--path2prompts".to_string(),
            self.path2prompts.clone(),
            "--path2save".to_string(),
            self.path2save.clone(),
        ]
    }

    pub fn required_credentials(&self) -> &'static [&'static str] {
        self.family.required_credentials()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_order_is_resnet_dino_clip() {
        assert_eq!(
            ModelFamily::all(),
            &[ModelFamily::Resnet, ModelFamily::Dino, ModelFamily::Clip]
        );
    }

    #[test]
    fn family_round_trips() {
        for family in ModelFamily::all() {
            assert_eq!(family.as_str().parse::<ModelFamily>().unwrap(), *family);
        }
    }

    #[test]
    fn unknown_family_rejected() {
        let err = "vit".parse::<ModelFamily>().unwrap_err();
        assert!(matches!(err, ProbeError::UnknownFamily(_)));
    }

    #[test]
    fn unit_spec_parses_dotted_layers() {
        let spec: UnitSpec = "blocks.11.attn:3".parse().unwrap();
        assert_eq!(spec.layer, "blocks.11.attn");
        assert_eq!(spec.index, 3);
        assert_eq!(spec.to_string(), "blocks.11.attn:3");
    }

    #[test]
    fn unit_spec_rejects_malformed() {
        for bad in ["layer4", "layer4:", ":7", "layer4:abc", "Layer4:1", "a..b:0"] {
            assert!(
                bad.parse::<UnitSpec>().is_err(),
                "expected invalid: {bad}"
            );
        }
    }

    #[test]
    fn unit_mode_parses() {
        assert_eq!("all".parse::<UnitMode>().unwrap(), UnitMode::All);
        assert_eq!("random".parse::<UnitMode>().unwrap(), UnitMode::Random);
        assert_eq!("manual".parse::<UnitMode>().unwrap(), UnitMode::Manual);
        assert!("some".parse::<UnitMode>().is_err());
    }

    #[test]
    fn default_argv_for_clip() {
        let spec = RunSpec::resolve(
            ModelFamily::Clip,
            &Config::default(),
            &RunOverrides::default(),
        );
        assert_eq!(
            spec.argv(),
            vec![
                "--agent",
                "gemini-2.5-flash",
                "--model",
                "clip",
                "--unit_mode",
                "manual",
                "--units",
                "visual.transformer.resblocks.22:9",
                "--device",
                "0",
                "--path2prompts",
                "prompts/clip.json",
                "--path2save",
                "results/clip",
            ]
        );
    }

    #[test]
    fn overrides_win_over_config_and_defaults() {
        let mut config = Config::default();
        config.families.insert(
            "dino".to_string(),
            crate::config::FamilyConfig {
                device: Some("1".to_string()),
                agent: Some("gemini-2.5-pro".to_string()),
                ..Default::default()
            },
        );
        let ov = RunOverrides {
            device: Some("2".to_string()),
            ..Default::default()
        };
        let spec = RunSpec::resolve(ModelFamily::Dino, &config, &ov);
        // CLI beats config, config beats the built-in default
        assert_eq!(spec.device, "2");
        assert_eq!(spec.agent, "gemini-2.5-pro");
        assert_eq!(spec.path2prompts, "prompts/dino.json");
    }

    #[test]
    fn multiple_units_join_with_commas() {
        let mut spec = RunSpec::resolve(
            ModelFamily::Resnet,
            &Config::default(),
            &RunOverrides::default(),
        );
        spec.units = vec![
            "layer4:7".parse().unwrap(),
            "layer3:120".parse().unwrap(),
        ];
        let argv = spec.argv();
        let pos = argv.iter().position(|a| a == "--units").unwrap();
        assert_eq!(argv[pos + 1], "layer4:7,layer3:120");
    }

    #[test]
    fn only_agent_backed_families_require_the_key() {
        assert!(ModelFamily::Resnet.required_credentials().is_empty());
        assert_eq!(
            ModelFamily::Clip.required_credentials(),
            &[crate::env::GEMINI_API_KEY]
        );
        assert_eq!(
            ModelFamily::Dino.required_credentials(),
            &[crate::env::GEMINI_API_KEY]
        );
    }
}
