//! Flow records (`risk_flows` stream)

use serde::{Deserialize, Serialize};

use super::caps::CapsHit;
use crate::config::{SanitizerPolicy, Strictness};
use crate::features::risk_matching::Severity;
use crate::features::risk_summary::RuleType;

pub const FLOW_SCHEMA_VERSION: u32 = 1;

/// Source or sink end of a flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEndpoint {
    pub chunk_uid: String,
    pub rule_id: String,
    pub rule_name: String,
    pub rule_type: RuleType,
    pub category: Option<String>,
    /// Always null on the source end
    pub severity: Option<Severity>,
    pub confidence: Option<f64>,
}

/// Chunks visited root→sink, with the call sites sampled for each hop
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPath {
    pub chunk_uids: Vec<String>,
    /// One entry per hop (`chunk_uids.len() - 1`)
    pub call_site_ids_by_step: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNotes {
    pub strictness: Strictness,
    pub sanitizer_policy: SanitizerPolicy,
    pub hop_count: usize,
    pub sanitizer_barriers_hit: usize,
    /// Caps hit anywhere in the run before this flow was emitted
    pub caps_hit: CapsHit,
}

/// One interprocedural source→sink flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRecord {
    pub schema_version: u32,
    pub flow_id: String,
    pub source: FlowEndpoint,
    pub sink: FlowEndpoint,
    pub path: FlowPath,
    pub confidence: f64,
    pub notes: FlowNotes,
}

impl FlowRecord {
    pub fn serialized_len(&self) -> usize {
        serde_json::to_vec(self).map_or(usize::MAX, |bytes| bytes.len())
    }

    /// Call site ids referenced by any hop
    pub fn call_site_ids(&self) -> impl Iterator<Item = &str> {
        self.path
            .call_site_ids_by_step
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}
