//! Engine statistics (`risk_interprocedural_stats`)

use serde::{Deserialize, Serialize};

use super::caps::{CapKind, CapsHit};
use crate::config::{EmitArtifacts, RiskCaps, SanitizerPolicy, Strictness};

pub const CALL_SITE_ORDER: &str =
    "file,startLine,startCol,endLine,endCol,calleeNormalized,calleeRaw,callSiteId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    #[default]
    Disabled,
    Ok,
    TimedOut,
}

impl EngineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Ok => "ok",
            Self::TimedOut => "timed_out",
        }
    }
}

/// Configuration echoed back as the engine saw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub enabled: bool,
    pub summary_only: bool,
    pub strictness: Strictness,
    pub emit_artifacts: EmitArtifacts,
    pub sanitizer_policy: SanitizerPolicy,
    /// Raw caps; unset stays null
    pub caps: RiskCaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineCounts {
    pub chunks_considered: usize,
    pub summaries_emitted: usize,
    pub source_roots: usize,
    pub resolved_edges: usize,
    pub flows_emitted: usize,
    pub risks_with_flows: usize,
    pub unique_call_sites_referenced: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSiteSampling {
    pub strategy: String,
    pub max_call_sites_per_edge: Option<usize>,
    pub order: String,
}

impl CallSiteSampling {
    pub fn first_n(max_call_sites_per_edge: Option<usize>) -> Self {
        Self {
            strategy: "firstN".to_string(),
            max_call_sites_per_edge,
            order: CALL_SITE_ORDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingMs {
    pub summaries: u64,
    pub propagation: u64,
    pub io: u64,
    pub total: u64,
}

impl TimingMs {
    pub fn recompute_total(&mut self) {
        self.total = self.summaries + self.propagation + self.io;
    }
}

/// Reference to a persisted row stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRef {
    pub name: String,
    pub format: String,
    pub sharded: bool,
    pub entrypoint: String,
    pub total_entries: usize,
}

impl ArtifactRef {
    pub fn jsonl(
        name: impl Into<String>,
        sharded: bool,
        entrypoint: impl Into<String>,
        total_entries: usize,
    ) -> Self {
        Self {
            name: name.into(),
            format: "jsonl".to_string(),
            sharded,
            entrypoint: entrypoint.into(),
            total_entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_summaries: Option<ArtifactRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_flows: Option<ArtifactRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_sites: Option<ArtifactRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropReason {
    pub reason: String,
    pub count: usize,
}

/// Rows of one artifact dropped before writing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRecords {
    pub artifact: String,
    pub count: usize,
    pub reasons: Vec<DropReason>,
}

impl DroppedRecords {
    pub fn new(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            count: 0,
            reasons: Vec::new(),
        }
    }

    pub fn record(&mut self, reason: &str) {
        self.count += 1;
        match self.reasons.iter_mut().find(|r| r.reason == reason) {
            Some(existing) => existing.count += 1,
            None => self.reasons.push(DropReason {
                reason: reason.to_string(),
                count: 1,
            }),
        }
    }
}

/// Run-level statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub schema_version: u32,
    pub generated_at: String,
    pub mode: String,
    pub status: EngineStatus,
    pub reason: Option<String>,
    pub effective_config: EffectiveConfig,
    pub counts: EngineCounts,
    pub call_site_sampling: CallSiteSampling,
    pub caps_hit: CapsHit,
    pub timing_ms: TimingMs,
    pub artifacts: ArtifactRefs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_records: Vec<DroppedRecords>,
}

impl EngineStats {
    pub fn hit(&self, cap: CapKind) -> bool {
        self.caps_hit.contains(&cap)
    }

    /// Set the references for whichever artifacts were written
    pub fn attach_artifact_refs(
        &mut self,
        summaries: Option<ArtifactRef>,
        flows: Option<ArtifactRef>,
        call_sites: Option<ArtifactRef>,
    ) {
        if summaries.is_some() {
            self.artifacts.risk_summaries = summaries;
        }
        if flows.is_some() {
            self.artifacts.risk_flows = flows;
        }
        if call_sites.is_some() {
            self.artifacts.call_sites = call_sites;
        }
    }
}
