//! Interprocedural risk configuration
//!
//! `RiskInterproceduralConfig` is an immutable value handed to the engine by
//! the orchestrator. Caps are optional: an unset cap keeps the engine's
//! built-in fallback (see `taint_analysis::EffectiveCaps`).

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;

/// How strictly an edge must carry taint before it is followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strictness {
    /// Follow every resolved call edge
    #[default]
    Conservative,
    /// Follow an edge only if a call argument carries taint
    ArgAware,
}

impl Strictness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::ArgAware => "argAware",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "conservative" => Some(Self::Conservative),
            "argAware" | "arg_aware" => Some(Self::ArgAware),
            _ => None,
        }
    }
}

/// What a sanitizer signal does to a path passing through it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SanitizerPolicy {
    /// The sanitizing function absorbs taint; no expansion past it
    #[default]
    Terminate,
    /// Keep expanding, lowering confidence per sanitizer crossed
    Weaken,
}

impl SanitizerPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terminate => "terminate",
            Self::Weaken => "weaken",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "terminate" => Some(Self::Terminate),
            "weaken" => Some(Self::Weaken),
            _ => None,
        }
    }
}

/// Artifact format requested from the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitArtifacts {
    #[default]
    Jsonl,
    #[serde(rename = "none")]
    Disabled,
}

/// Resource caps bounding one propagation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskCaps {
    pub max_depth: Option<usize>,
    pub max_paths_per_pair: Option<usize>,
    pub max_total_flows: Option<usize>,
    pub max_call_sites_per_edge: Option<usize>,
    pub max_edge_expansions: Option<usize>,
    pub max_ms: Option<u64>,
}

impl RiskCaps {
    /// Wire names accepted by `apply_override`
    pub const FIELDS: [&'static str; 6] = [
        "maxDepth",
        "maxPathsPerPair",
        "maxTotalFlows",
        "maxCallSitesPerEdge",
        "maxEdgeExpansions",
        "maxMs",
    ];

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                max_depth: Some(2),
                max_paths_per_pair: Some(1),
                max_total_flows: Some(200),
                max_call_sites_per_edge: Some(1),
                max_edge_expansions: Some(5_000),
                max_ms: Some(1_000),
            },
            Preset::Balanced => Self {
                max_depth: Some(4),
                max_paths_per_pair: Some(3),
                max_total_flows: Some(1_000),
                max_call_sites_per_edge: Some(3),
                max_edge_expansions: Some(50_000),
                max_ms: Some(5_000),
            },
            Preset::Thorough => Self {
                max_depth: Some(8),
                max_paths_per_pair: Some(5),
                max_total_flows: Some(5_000),
                max_call_sites_per_edge: Some(5),
                max_edge_expansions: Some(250_000),
                max_ms: Some(30_000),
            },
            Preset::Custom => Self::default(),
        }
    }

    /// Set one cap from its wire name; an empty value or `null` unsets it
    pub fn apply_override(&mut self, field: &str, raw: &str) -> ConfigResult<()> {
        let raw = raw.trim();
        let unset = raw.is_empty() || raw == "null";
        let parse = |field: &str| -> ConfigResult<Option<u64>> {
            if unset {
                return Ok(None);
            }
            raw.parse::<u64>()
                .map(Some)
                .map_err(|_| ConfigError::invalid_value(field, raw, "a non-negative integer"))
        };
        let as_usize = |v: Option<u64>| v.map(|n| n as usize);
        match field {
            "maxDepth" => self.max_depth = as_usize(parse(field)?),
            "maxPathsPerPair" => self.max_paths_per_pair = as_usize(parse(field)?),
            "maxTotalFlows" => self.max_total_flows = as_usize(parse(field)?),
            "maxCallSitesPerEdge" => self.max_call_sites_per_edge = as_usize(parse(field)?),
            "maxEdgeExpansions" => self.max_edge_expansions = as_usize(parse(field)?),
            "maxMs" => self.max_ms = parse(field)?,
            _ => {
                return Err(ConfigError::unknown_field_with_suggestion(
                    field,
                    "caps",
                    Self::FIELDS.iter().map(|f| f.to_string()).collect(),
                ))
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_range("maxDepth", self.max_depth, 1, 64, "Call chain depth must be at least 1")?;
        check_range(
            "maxPathsPerPair",
            self.max_paths_per_pair,
            1,
            1_000,
            "At least one path per source/sink pair",
        )?;
        check_range(
            "maxTotalFlows",
            self.max_total_flows,
            0,
            1_000_000,
            "Use 0 to disable flow emission",
        )?;
        check_range(
            "maxCallSitesPerEdge",
            self.max_call_sites_per_edge,
            1,
            100,
            "Sampled call sites per edge",
        )?;
        check_range(
            "maxEdgeExpansions",
            self.max_edge_expansions,
            1,
            10_000_000,
            "Edge expansion budget must be finite",
        )?;
        check_range(
            "maxMs",
            self.max_ms.map(|v| v as usize),
            1,
            3_600_000,
            "Propagation timeout should be at most 1 hour",
        )?;
        Ok(())
    }
}

fn check_range(
    field: &str,
    value: Option<usize>,
    min: usize,
    max: usize,
    hint: &str,
) -> ConfigResult<()> {
    match value {
        Some(v) if v < min || v > max => Err(ConfigError::range_with_hint(field, v, min, max, hint)),
        _ => Ok(()),
    }
}

/// Interprocedural risk configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskInterproceduralConfig {
    pub enabled: bool,
    pub summary_only: bool,
    pub strictness: Strictness,
    pub sanitizer_policy: SanitizerPolicy,
    pub emit_artifacts: EmitArtifacts,
    pub caps: RiskCaps,
}

impl RiskInterproceduralConfig {
    /// Get preset configuration
    pub fn from_preset(preset: Preset) -> Self {
        let (strictness, sanitizer_policy) = match preset {
            Preset::Thorough => (Strictness::ArgAware, SanitizerPolicy::Weaken),
            _ => (Strictness::Conservative, SanitizerPolicy::Terminate),
        };
        Self {
            enabled: true,
            summary_only: false,
            strictness,
            sanitizer_policy,
            emit_artifacts: EmitArtifacts::Jsonl,
            caps: RiskCaps::from_preset(preset),
        }
    }

    /// Disabled configuration (no propagation, rollups report disabled)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builder: Set enabled
    pub fn enabled(mut self, v: bool) -> Self {
        self.enabled = v;
        self
    }

    /// Builder: Set summary_only
    pub fn summary_only(mut self, v: bool) -> Self {
        self.summary_only = v;
        self
    }

    /// Builder: Set strictness
    pub fn strictness(mut self, v: Strictness) -> Self {
        self.strictness = v;
        self
    }

    /// Builder: Set sanitizer_policy
    pub fn sanitizer_policy(mut self, v: SanitizerPolicy) -> Self {
        self.sanitizer_policy = v;
        self
    }

    /// Builder: Replace all caps
    pub fn caps(mut self, caps: RiskCaps) -> Self {
        self.caps = caps;
        self
    }

    /// Builder: Set max_depth
    pub fn max_depth(mut self, v: usize) -> Self {
        self.caps.max_depth = Some(v);
        self
    }

    /// Builder: Set max_paths_per_pair
    pub fn max_paths_per_pair(mut self, v: usize) -> Self {
        self.caps.max_paths_per_pair = Some(v);
        self
    }

    /// Builder: Set max_total_flows
    pub fn max_total_flows(mut self, v: usize) -> Self {
        self.caps.max_total_flows = Some(v);
        self
    }

    /// Builder: Set max_call_sites_per_edge
    pub fn max_call_sites_per_edge(mut self, v: usize) -> Self {
        self.caps.max_call_sites_per_edge = Some(v);
        self
    }

    /// Builder: Set max_edge_expansions
    pub fn max_edge_expansions(mut self, v: usize) -> Self {
        self.caps.max_edge_expansions = Some(v);
        self
    }

    /// Builder: Set max_ms (`None` removes the deadline)
    pub fn max_ms(mut self, v: Option<u64>) -> Self {
        self.caps.max_ms = v;
        self
    }

    /// Apply a `key=value` override; cap keys may be prefixed with `caps.`
    pub fn apply_override(&mut self, key: &str, raw: &str) -> ConfigResult<()> {
        let value = raw.trim();
        let parse_bool = |field: &str| -> ConfigResult<bool> {
            match value {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ConfigError::invalid_value(field, value, "true or false")),
            }
        };
        match key {
            "enabled" => self.enabled = parse_bool(key)?,
            "summaryOnly" => self.summary_only = parse_bool(key)?,
            "strictness" => {
                self.strictness = Strictness::parse(value).ok_or_else(|| {
                    ConfigError::invalid_value(key, value, "conservative or argAware")
                })?
            }
            "sanitizerPolicy" => {
                self.sanitizer_policy = SanitizerPolicy::parse(value).ok_or_else(|| {
                    ConfigError::invalid_value(key, value, "terminate or weaken")
                })?
            }
            "emitArtifacts" => {
                self.emit_artifacts = match value {
                    "jsonl" => EmitArtifacts::Jsonl,
                    "none" => EmitArtifacts::Disabled,
                    _ => return Err(ConfigError::invalid_value(key, value, "jsonl or none")),
                }
            }
            _ => {
                let cap = key.strip_prefix("caps.").unwrap_or(key);
                self.caps.apply_override(cap, value)?;
            }
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.caps.validate()?;
        if self.summary_only && !self.enabled {
            return Err(ConfigError::Validation(
                "summaryOnly requires interprocedural analysis to be enabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RiskInterproceduralConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for RiskInterproceduralConfig {
    fn validate(&self) -> ConfigResult<()> {
        RiskInterproceduralConfig::validate(self)
    }

    fn config_name(&self) -> &'static str {
        "RiskInterproceduralConfig"
    }
}
