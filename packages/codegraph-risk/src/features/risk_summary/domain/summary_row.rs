//! Per-chunk summary row (`risk_summaries` stream)

use serde::{Deserialize, Serialize};

use super::evidence::EvidenceLocation;
use super::signal::{LocalFlow, RiskSignal};

pub const ROW_SCHEMA_VERSION: u32 = 1;

/// Serialized-row ceiling for summary and flow rows
pub const MAX_ROW_BYTES: usize = 32 * 1024;

/// Per-row list caps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryCaps {
    pub max_signals_per_kind: usize,
    pub max_evidence_per_signal: usize,
    pub max_tags_per_signal: usize,
    pub max_local_flows: usize,
    pub max_taint_identifiers: usize,
}

impl SummaryCaps {
    pub const DEFAULT: SummaryCaps = SummaryCaps {
        max_signals_per_kind: 50,
        max_evidence_per_signal: 5,
        max_tags_per_signal: 10,
        max_local_flows: 50,
        max_taint_identifiers: 50,
    };
}

impl Default for SummaryCaps {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRef {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSignals {
    pub sources: Vec<RiskSignal>,
    pub sinks: Vec<RiskSignal>,
    pub sanitizers: Vec<RiskSignal>,
    pub local_flows: Vec<LocalFlow>,
}

impl RiskSignals {
    /// Every evidence list in the row, local flows included
    pub fn evidence_lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<EvidenceLocation>> {
        self.sources
            .iter_mut()
            .chain(self.sinks.iter_mut())
            .chain(self.sanitizers.iter_mut())
            .map(|signal| &mut signal.evidence)
            .chain(self.local_flows.iter_mut().map(|flow| &mut flow.evidence))
    }

    pub fn signals_mut(&mut self) -> impl Iterator<Item = &mut RiskSignal> {
        self.sources
            .iter_mut()
            .chain(self.sinks.iter_mut())
            .chain(self.sanitizers.iter_mut())
    }
}

/// Pre-truncation list lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalTotals {
    pub sources: usize,
    pub sinks: usize,
    pub sanitizers: usize,
    pub local_flows: usize,
}

impl SignalTotals {
    pub fn is_zero(&self) -> bool {
        self.sources == 0 && self.sinks == 0 && self.sanitizers == 0 && self.local_flows == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationFlags {
    pub sources: bool,
    pub sinks: bool,
    pub sanitizers: bool,
    pub local_flows: bool,
    pub evidence: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaintHintsRow {
    pub tainted_identifiers: Vec<String>,
}

/// One row per chunk with at least one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummaryRow {
    pub schema_version: u32,
    pub chunk_uid: String,
    pub file: String,
    pub language_id: Option<String>,
    pub symbol: SymbolRef,
    pub signals: RiskSignals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taint_hints: Option<TaintHintsRow>,
    pub totals: SignalTotals,
    pub truncated: TruncationFlags,
}

impl RiskSummaryRow {
    /// Tainted identifiers, empty when the row carries no hints
    pub fn tainted_identifiers(&self) -> &[String] {
        self.taint_hints
            .as_ref()
            .map_or(&[], |hints| hints.tainted_identifiers.as_slice())
    }

    /// Compact JSON size in bytes
    pub fn serialized_len(&self) -> usize {
        serde_json::to_vec(self).map_or(usize::MAX, |bytes| bytes.len())
    }
}
