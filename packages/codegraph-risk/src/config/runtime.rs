//! Per-build runtime handed to summarization and propagation
//!
//! Built once by the indexing orchestrator and passed by reference; nothing
//! here is global or mutated during a run.

use serde::{Deserialize, Serialize};

use super::io::LoadedRiskConfig;
use super::risk_config::RiskInterproceduralConfig;
use super::rules::SourceRuleConfig;
use crate::features::risk_matching::SourceRule;

/// Index being built; interprocedural analysis only runs for code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexMode {
    #[default]
    Code,
    Prose,
    Records,
    ExtractedProse,
}

impl IndexMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Prose => "prose",
            Self::Records => "records",
            Self::ExtractedProse => "extracted-prose",
        }
    }
}

/// Config plus compiled source rules for one build
#[derive(Debug, Clone)]
pub struct RiskRuntime {
    pub config: RiskInterproceduralConfig,
    pub source_rules: Vec<SourceRule>,
    pub mode: IndexMode,
}

impl RiskRuntime {
    pub fn new(config: RiskInterproceduralConfig) -> Self {
        Self {
            config,
            source_rules: Vec::new(),
            mode: IndexMode::Code,
        }
    }

    /// Compile and attach source rules; invalid patterns are skipped
    pub fn with_source_rules(mut self, rules: &[SourceRuleConfig]) -> Self {
        self.source_rules = rules.iter().map(SourceRule::compile).collect();
        self
    }

    pub fn with_mode(mut self, mode: IndexMode) -> Self {
        self.mode = mode;
        self
    }

    /// Interprocedural state as seen by summarization rollups
    pub fn interprocedural_state(&self) -> InterproceduralState {
        InterproceduralState::resolve(&self.config, self.mode)
    }
}

impl From<LoadedRiskConfig> for RiskRuntime {
    fn from(loaded: LoadedRiskConfig) -> Self {
        RiskRuntime::new(loaded.config).with_source_rules(&loaded.source_rules)
    }
}

/// Whether interprocedural analysis is on for this build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterproceduralState {
    pub enabled: bool,
    pub summary_only: bool,
}

impl InterproceduralState {
    pub fn resolve(config: &RiskInterproceduralConfig, mode: IndexMode) -> Self {
        let enabled = mode == IndexMode::Code && config.enabled;
        Self {
            enabled,
            summary_only: enabled && config.summary_only,
        }
    }
}
