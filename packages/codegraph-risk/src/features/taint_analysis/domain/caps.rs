//! Cap normalization and cap-hit bookkeeping

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::RiskCaps;

/// A limit that stopped or pruned traversal
///
/// Variants are declared in wire-name order so `BTreeSet<CapKind>` iterates
/// lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapKind {
    MaxDepth,
    MaxEdgeExpansions,
    MaxMs,
    MaxPathsPerPair,
    MaxTotalFlows,
}

impl CapKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxDepth => "maxDepth",
            Self::MaxEdgeExpansions => "maxEdgeExpansions",
            Self::MaxMs => "maxMs",
            Self::MaxPathsPerPair => "maxPathsPerPair",
            Self::MaxTotalFlows => "maxTotalFlows",
        }
    }
}

pub type CapsHit = BTreeSet<CapKind>;

/// Caps after engine-entry normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveCaps {
    /// At least 1; unset → 1
    pub max_depth: usize,
    /// At least 1; unset → 1
    pub max_paths_per_pair: usize,
    /// `None` = unlimited; `Some(0)` disables flow emission
    pub max_total_flows: Option<usize>,
    /// `None` = every call site; otherwise at least 1
    pub max_call_sites_per_edge: Option<usize>,
    /// `None` = unlimited; otherwise at least 1
    pub max_edge_expansions: Option<usize>,
    /// `None` = no deadline; otherwise at least 1 ms
    pub max_ms: Option<u64>,
}

impl From<&RiskCaps> for EffectiveCaps {
    fn from(caps: &RiskCaps) -> Self {
        Self {
            max_depth: caps.max_depth.unwrap_or(1).max(1),
            max_paths_per_pair: caps.max_paths_per_pair.unwrap_or(1).max(1),
            max_total_flows: caps.max_total_flows,
            max_call_sites_per_edge: caps.max_call_sites_per_edge.map(|n| n.max(1)),
            max_edge_expansions: caps.max_edge_expansions.map(|n| n.max(1)),
            max_ms: caps.max_ms.map(|ms| ms.max(1)),
        }
    }
}
