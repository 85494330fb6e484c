//! Summarize raw chunk risk into rows and rollups
//!
//! `summarize` never touches its input: the compact rollups come back keyed
//! by chunk uid and the caller decides when to apply them
//! (`SummarizeOutput::apply_rollups`). `summarize_in_place` does both steps
//! for callers that own the chunk slice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::InterproceduralState;
use crate::features::risk_summary::domain::{
    RiskSignals, RiskSummaryRow, RuleType, SignalTotals, SummaryCaps, SymbolRef, TruncationFlags,
    MAX_ROW_BYTES, ROW_SCHEMA_VERSION,
};
use crate::features::risk_summary::infrastructure::{
    build_compact_summary, clamp_evidence, clamp_list, enforce_row_size, normalize_local_flows,
    normalize_signals, normalize_taint_hints, EvidenceContext,
};
use crate::shared::models::{CompactRiskSummary, RiskChunk, RiskPayload};
use crate::shared::utils::to_posix_path;

/// Summarization counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Rows built before the size ceiling
    pub candidates: usize,
    pub emitted: usize,
    pub summaries_dropped_by_size: usize,
}

/// Rows in input order plus rollups keyed by chunk uid
#[derive(Debug, Clone, Default)]
pub struct SummarizeOutput {
    pub rows: Vec<RiskSummaryRow>,
    pub rollups: BTreeMap<String, CompactRiskSummary>,
    pub stats: SummaryStats,
}

impl SummarizeOutput {
    /// Write rollups onto `docmeta.risk.summary` of matching chunks
    pub fn apply_rollups(&self, chunks: &mut [RiskChunk]) -> usize {
        apply_rollups(&self.rollups, chunks)
    }

    /// Rows keyed by chunk uid; a later duplicate uid wins
    pub fn rows_by_uid(&self) -> BTreeMap<&str, &RiskSummaryRow> {
        self.rows
            .iter()
            .map(|row| (row.chunk_uid.as_str(), row))
            .collect()
    }
}

/// Attach each rollup to the chunk sharing its uid; returns chunks touched
pub fn apply_rollups(
    rollups: &BTreeMap<String, CompactRiskSummary>,
    chunks: &mut [RiskChunk],
) -> usize {
    let mut applied = 0;
    for chunk in chunks.iter_mut() {
        let Some(rollup) = chunk.uid().and_then(|uid| rollups.get(uid)) else {
            continue;
        };
        chunk
            .docmeta
            .risk
            .get_or_insert_with(RiskPayload::default)
            .summary = Some(rollup.clone());
        applied += 1;
    }
    applied
}

fn build_row(chunk: &RiskChunk, risk: &RiskPayload, caps: &SummaryCaps) -> Option<RiskSummaryRow> {
    let chunk_uid = chunk.uid()?.to_string();
    let file = chunk
        .file
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(to_posix_path)?;

    let ctx = EvidenceContext::new(Some(file.as_str()), chunk.start_line);
    let max_tags = caps.max_tags_per_signal;
    let mut signals = RiskSignals {
        sources: normalize_signals(&risk.sources, RuleType::Source, ctx, max_tags),
        sinks: normalize_signals(&risk.sinks, RuleType::Sink, ctx, max_tags),
        sanitizers: normalize_signals(&risk.sanitizers, RuleType::Sanitizer, ctx, max_tags),
        local_flows: normalize_local_flows(&risk.flows, ctx),
    };

    let totals = SignalTotals {
        sources: risk.sources.len(),
        sinks: risk.sinks.len(),
        sanitizers: risk.sanitizers.len(),
        local_flows: risk.flows.len(),
    };
    if totals.is_zero() {
        return None;
    }

    let mut truncated = TruncationFlags {
        sources: clamp_list(&mut signals.sources, caps.max_signals_per_kind),
        sinks: clamp_list(&mut signals.sinks, caps.max_signals_per_kind),
        sanitizers: clamp_list(&mut signals.sanitizers, caps.max_signals_per_kind),
        local_flows: clamp_list(&mut signals.local_flows, caps.max_local_flows),
        evidence: false,
    };
    truncated.evidence = clamp_evidence(signals.evidence_lists_mut(), caps.max_evidence_per_signal);

    Some(RiskSummaryRow {
        schema_version: ROW_SCHEMA_VERSION,
        chunk_uid,
        file,
        language_id: chunk.lang.clone().filter(|l| !l.is_empty()),
        symbol: SymbolRef {
            name: chunk.name.clone().filter(|n| !n.is_empty()),
            kind: chunk.kind.clone().filter(|k| !k.is_empty()),
            signature: chunk.docmeta.signature.clone().filter(|s| !s.is_empty()),
        },
        signals,
        taint_hints: normalize_taint_hints(risk.taint_hints.as_ref(), caps.max_taint_identifiers),
        totals,
        truncated,
    })
}

/// Build one summary row per chunk with risk signals
pub fn summarize(chunks: &[RiskChunk], state: InterproceduralState) -> SummarizeOutput {
    let caps = SummaryCaps::DEFAULT;
    let mut output = SummarizeOutput::default();

    for chunk in chunks {
        let Some(risk) = chunk.docmeta.risk.as_ref() else {
            continue;
        };
        let Some(mut row) = build_row(chunk, risk, &caps) else {
            continue;
        };
        output.stats.candidates += 1;

        if !enforce_row_size(&mut row, MAX_ROW_BYTES).is_kept() {
            output.stats.summaries_dropped_by_size += 1;
            warn!(file = %row.file, chunk_uid = %row.chunk_uid, "[risk] summary dropped due to size");
            continue;
        }

        if let Some(compact) = build_compact_summary(risk, state) {
            output.rollups.insert(row.chunk_uid.clone(), compact);
        }
        output.rows.push(row);
        output.stats.emitted += 1;
    }

    debug!(
        chunks = chunks.len(),
        candidates = output.stats.candidates,
        emitted = output.stats.emitted,
        dropped = output.stats.summaries_dropped_by_size,
        "Risk summaries built"
    );
    output
}

/// `summarize` followed by `apply_rollups` on the same chunks
pub fn summarize_in_place(chunks: &mut [RiskChunk], state: InterproceduralState) -> SummarizeOutput {
    let output = summarize(chunks, state);
    output.apply_rollups(chunks);
    output
}
