//! Configuration I/O (YAML/JSON loading)
//!
//! File schema v1:
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! overrides:
//!   strictness: argAware
//!   caps:
//!     maxDepth: 6
//! sourceRules:
//!   - id: src.req
//!     patterns: ["req\\.(body|query)"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::risk_config::{
    EmitArtifacts, RiskCaps, RiskInterproceduralConfig, SanitizerPolicy, Strictness,
};
use super::rules::SourceRuleConfig;
use super::validation::ValidatableCollection;

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// Config file schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RiskConfigFile {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Fine-grained overrides on top of the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<RiskConfigOverrides>,

    /// Global source rules for argAware matching
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_rules: Vec<SourceRuleConfig>,
}

/// Field-level overrides; `None` keeps the preset value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RiskConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strictness: Option<Strictness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitizer_policy: Option<SanitizerPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit_artifacts: Option<EmitArtifacts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caps: Option<RiskCaps>,
}

/// Result of loading a config file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRiskConfig {
    pub config: RiskInterproceduralConfig,
    pub source_rules: Vec<SourceRuleConfig>,
}

impl RiskConfigFile {
    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<LoadedRiskConfig> {
        let file: RiskConfigFile = serde_yaml::from_str(yaml)?;
        file.resolve()
    }

    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> ConfigResult<LoadedRiskConfig> {
        let file: RiskConfigFile = serde_json::from_str(json)?;
        file.resolve()
    }

    /// Load from a YAML (`.yaml`/`.yml`) or JSON file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<LoadedRiskConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Export a config as a v1 file (all caps written as overrides)
    pub fn export(config: &RiskInterproceduralConfig, source_rules: &[SourceRuleConfig]) -> Self {
        Self {
            version: Some(1),
            preset: Some(Preset::Custom.as_str().to_string()),
            overrides: Some(RiskConfigOverrides {
                enabled: Some(config.enabled),
                summary_only: Some(config.summary_only),
                strictness: Some(config.strictness),
                sanitizer_policy: Some(config.sanitizer_policy),
                emit_artifacts: Some(config.emit_artifacts),
                caps: Some(config.caps),
            }),
            source_rules: source_rules.to_vec(),
        }
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn resolve(self) -> ConfigResult<LoadedRiskConfig> {
        let version = self.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match self.preset.as_deref() {
            Some(name) => Preset::from_str(name)?,
            None => Preset::default(),
        };
        let mut config = RiskInterproceduralConfig::from_preset(preset);

        if let Some(overrides) = self.overrides {
            if let Some(v) = overrides.enabled {
                config.enabled = v;
            }
            if let Some(v) = overrides.summary_only {
                config.summary_only = v;
            }
            if let Some(v) = overrides.strictness {
                config.strictness = v;
            }
            if let Some(v) = overrides.sanitizer_policy {
                config.sanitizer_policy = v;
            }
            if let Some(v) = overrides.emit_artifacts {
                config.emit_artifacts = v;
            }
            if let Some(caps) = overrides.caps {
                merge_caps(&mut config.caps, caps);
            }
        }

        config.validate()?;
        self.source_rules.validate_all()?;

        Ok(LoadedRiskConfig {
            config,
            source_rules: self.source_rules,
        })
    }
}

fn merge_caps(base: &mut RiskCaps, patch: RiskCaps) {
    base.max_depth = patch.max_depth.or(base.max_depth);
    base.max_paths_per_pair = patch.max_paths_per_pair.or(base.max_paths_per_pair);
    base.max_total_flows = patch.max_total_flows.or(base.max_total_flows);
    base.max_call_sites_per_edge = patch.max_call_sites_per_edge.or(base.max_call_sites_per_edge);
    base.max_edge_expansions = patch.max_edge_expansions.or(base.max_edge_expansions);
    base.max_ms = patch.max_ms.or(base.max_ms);
}
