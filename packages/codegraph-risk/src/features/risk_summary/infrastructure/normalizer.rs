//! Signal normalization
//!
//! Raw entries missing identity (`ruleId` + `ruleName`, or both rule ids of a
//! local flow) are dropped here, as is evidence without a numeric line and
//! column. Every list leaves this module in its canonical order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::features::risk_matching::Severity;
use crate::features::risk_summary::domain::{
    EvidenceLocation, LocalFlow, RiskSignal, RuleType, TaintHintsRow,
};
use crate::shared::models::{RawEvidence, RawLocalFlow, RawRiskSignal, TaintHints};
use crate::shared::utils::{collapse_whitespace, sha1_tagged};

/// Where chunk-relative evidence lands in the file
#[derive(Debug, Clone, Copy)]
pub struct EvidenceContext<'a> {
    pub file: Option<&'a str>,
    /// Added to chunk-relative lines (`chunk.startLine - 1`)
    pub line_offset: i64,
}

impl<'a> EvidenceContext<'a> {
    pub fn new(file: Option<&'a str>, chunk_start_line: Option<i64>) -> Self {
        Self {
            file,
            line_offset: chunk_start_line.map_or(0, |start| start.saturating_sub(1)),
        }
    }
}

fn snippet_hash(excerpt: Option<&str>) -> Option<String> {
    let collapsed = collapse_whitespace(excerpt?);
    if collapsed.is_empty() {
        None
    } else {
        Some(sha1_tagged(&collapsed))
    }
}

/// Convert raw evidence to absolute points, sorted by evidence key
pub fn normalize_evidence(raw: &[RawEvidence], ctx: EvidenceContext<'_>) -> Vec<EvidenceLocation> {
    let mut evidence: Vec<EvidenceLocation> = raw
        .iter()
        .filter_map(|entry| {
            let line = entry.line?;
            let column = entry.column?;
            Some(EvidenceLocation::point(
                ctx.file.map(str::to_string),
                line.saturating_add(ctx.line_offset),
                column,
                snippet_hash(entry.excerpt.as_deref()),
            ))
        })
        .collect();
    evidence.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    evidence
}

/// Trimmed, non-empty, sorted, unique; first `cap` kept
pub fn normalize_tags(raw: &[String], cap: usize) -> Vec<String> {
    raw.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(cap)
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

fn normalize_signal(
    raw: &RawRiskSignal,
    list_type: RuleType,
    ctx: EvidenceContext<'_>,
    max_tags: usize,
) -> Option<RiskSignal> {
    let rule_id = non_empty(raw.rule_id.as_ref()).or_else(|| non_empty(raw.id.as_ref()))?;
    let rule_name = non_empty(raw.name.as_ref())?;
    Some(RiskSignal {
        rule_id,
        rule_name,
        rule_type: raw
            .rule_type
            .as_deref()
            .and_then(RuleType::parse)
            .unwrap_or(list_type),
        category: non_empty(raw.category.as_ref()),
        severity: raw.severity.as_deref().and_then(Severity::parse),
        confidence: raw.confidence.filter(|c| c.is_finite()),
        tags: normalize_tags(&raw.tags, max_tags),
        evidence: normalize_evidence(&raw.evidence, ctx),
    })
}

fn compare_signals(a: &RiskSignal, b: &RiskSignal) -> Ordering {
    b.severity_rank()
        .cmp(&a.severity_rank())
        .then_with(|| a.rule_id.cmp(&b.rule_id))
        .then_with(|| a.min_evidence_key().cmp(&b.min_evidence_key()))
}

/// Normalize one signal list, sorted by severity desc, rule id, first evidence
pub fn normalize_signals(
    raw: &[RawRiskSignal],
    list_type: RuleType,
    ctx: EvidenceContext<'_>,
    max_tags: usize,
) -> Vec<RiskSignal> {
    let mut signals: Vec<RiskSignal> = raw
        .iter()
        .filter_map(|entry| normalize_signal(entry, list_type, ctx, max_tags))
        .collect();
    signals.sort_by(compare_signals);
    signals
}

/// Normalize local flows, sorted by source rule, sink rule, first evidence
pub fn normalize_local_flows(raw: &[RawLocalFlow], ctx: EvidenceContext<'_>) -> Vec<LocalFlow> {
    let mut flows: Vec<LocalFlow> = raw
        .iter()
        .filter_map(|flow| {
            let source_rule_id = non_empty(flow.rule_ids.first())
                .or_else(|| non_empty(flow.source.as_ref()))?;
            let sink_rule_id =
                non_empty(flow.rule_ids.get(1)).or_else(|| non_empty(flow.sink.as_ref()))?;
            Some(LocalFlow {
                source_rule_id,
                sink_rule_id,
                category: non_empty(flow.category.as_ref()),
                severity: flow.severity.as_deref().and_then(Severity::parse),
                confidence: flow.confidence.filter(|c| c.is_finite()),
                evidence: normalize_evidence(&flow.evidence, ctx),
            })
        })
        .collect();
    flows.sort_by(|a, b| {
        a.source_rule_id
            .cmp(&b.source_rule_id)
            .then_with(|| a.sink_rule_id.cmp(&b.sink_rule_id))
            .then_with(|| a.min_evidence_key().cmp(&b.min_evidence_key()))
    });
    flows
}

/// Trimmed, unique, sorted identifiers; `None` when nothing remains
pub fn normalize_taint_hints(raw: Option<&TaintHints>, cap: usize) -> Option<TaintHintsRow> {
    let identifiers = normalize_tags(&raw?.tainted_identifiers, cap);
    if identifiers.is_empty() {
        return None;
    }
    Some(TaintHintsRow {
        tainted_identifiers: identifiers,
    })
}
