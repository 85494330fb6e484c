//! Interprocedural propagation entry point
//!
//! Builds the call index, gates on the interprocedural state, runs the
//! worklist engine and turns its raw run into ordered flow rows plus
//! `EngineStats`. Never fails: malformed input degrades to fewer flows.

use std::collections::BTreeSet;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::config::RiskRuntime;
use crate::features::risk_summary::RiskSummaryRow;
use crate::features::taint_analysis::domain::{
    ArtifactRef, CallSiteSampling, DroppedRecords, EffectiveCaps, EffectiveConfig, EngineCounts,
    EngineStats, EngineStatus, FlowRecord, TimingMs, FLOW_SCHEMA_VERSION,
};
use crate::features::taint_analysis::infrastructure::{
    CallIndex, Clock, PropagationEngine, SystemClock,
};
use crate::shared::models::RiskChunk;

/// Artifact name used for dropped-row accounting
const FLOWS_ARTIFACT: &str = "risk_flows";

/// Everything one propagation run reads
#[derive(Debug, Clone, Copy)]
pub struct PropagateInput<'a> {
    pub chunks: &'a [RiskChunk],
    pub summaries: &'a [RiskSummaryRow],
    pub runtime: &'a RiskRuntime,
    /// Summarization time, echoed into `timingMs.summaries`
    pub summary_timing_ms: u64,
}

impl<'a> PropagateInput<'a> {
    pub fn new(
        chunks: &'a [RiskChunk],
        summaries: &'a [RiskSummaryRow],
        runtime: &'a RiskRuntime,
    ) -> Self {
        Self {
            chunks,
            summaries,
            runtime,
            summary_timing_ms: 0,
        }
    }

    pub fn with_summary_timing(mut self, ms: u64) -> Self {
        self.summary_timing_ms = ms;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PropagationOutput {
    pub status: EngineStatus,
    /// Sorted by (source chunk, source rule, sink chunk, sink rule, path, flowId)
    pub flow_rows: Vec<FlowRecord>,
    pub stats: EngineStats,
    pub call_site_ids_referenced: BTreeSet<String>,
}

impl PropagationOutput {
    fn without_flows(stats: EngineStats) -> Self {
        Self {
            status: stats.status,
            flow_rows: Vec::new(),
            stats,
            call_site_ids_referenced: BTreeSet::new(),
        }
    }
}

fn base_stats(
    input: &PropagateInput<'_>,
    index: &CallIndex<'_>,
    caps: &EffectiveCaps,
) -> EngineStats {
    let runtime = input.runtime;
    let state = runtime.interprocedural_state();
    let summaries = index.summary_count();
    let mut timing_ms = TimingMs {
        summaries: input.summary_timing_ms,
        ..Default::default()
    };
    timing_ms.recompute_total();

    EngineStats {
        schema_version: FLOW_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        mode: runtime.mode.as_str().to_string(),
        status: EngineStatus::Disabled,
        reason: None,
        effective_config: EffectiveConfig {
            enabled: state.enabled,
            summary_only: runtime.config.summary_only,
            strictness: runtime.config.strictness,
            emit_artifacts: runtime.config.emit_artifacts,
            sanitizer_policy: runtime.config.sanitizer_policy,
            caps: runtime.config.caps,
        },
        counts: EngineCounts {
            chunks_considered: summaries,
            summaries_emitted: summaries,
            resolved_edges: index.resolved_edges(),
            ..Default::default()
        },
        call_site_sampling: CallSiteSampling::first_n(caps.max_call_sites_per_edge),
        caps_hit: Default::default(),
        timing_ms,
        artifacts: Default::default(),
        dropped_records: Vec::new(),
    }
}

fn sort_flows(flows: &mut [FlowRecord]) {
    flows.sort_by(|a, b| {
        a.source
            .chunk_uid
            .cmp(&b.source.chunk_uid)
            .then_with(|| a.source.rule_id.cmp(&b.source.rule_id))
            .then_with(|| a.sink.chunk_uid.cmp(&b.sink.chunk_uid))
            .then_with(|| a.sink.rule_id.cmp(&b.sink.rule_id))
            .then_with(|| a.path.chunk_uids.join("\0").cmp(&b.path.chunk_uids.join("\0")))
            .then_with(|| a.flow_id.cmp(&b.flow_id))
    });
}

/// Run propagation against the wall clock
pub fn propagate(input: PropagateInput<'_>) -> PropagationOutput {
    propagate_with_clock(input, SystemClock::start())
}

/// Run propagation with an explicit deadline clock
pub fn propagate_with_clock<C: Clock>(input: PropagateInput<'_>, clock: C) -> PropagationOutput {
    // maxMs covers index construction too
    let started_ms = clock.elapsed_ms();
    let index = CallIndex::build(input.chunks, input.summaries);
    let config = &input.runtime.config;
    let caps = EffectiveCaps::from(&config.caps);
    let mut stats = base_stats(&input, &index, &caps);

    let state = input.runtime.interprocedural_state();
    if !state.enabled || state.summary_only {
        stats.status = if state.summary_only {
            EngineStatus::Ok
        } else {
            EngineStatus::Disabled
        };
        stats.reason = (!state.enabled).then(|| "disabled".to_string());
        return PropagationOutput::without_flows(stats);
    }

    let engine = PropagationEngine::new(
        &index,
        config.strictness,
        config.sanitizer_policy,
        caps,
        &input.runtime.source_rules,
        clock,
    );
    let mut run = engine.run_from(started_ms);

    stats.counts.source_roots = run.source_roots;
    stats.caps_hit = std::mem::take(&mut run.caps_hit);
    stats.timing_ms.propagation = run.elapsed_ms;
    stats.timing_ms.recompute_total();
    if run.dropped_oversized > 0 {
        let mut dropped = DroppedRecords::new(FLOWS_ARTIFACT);
        for _ in 0..run.dropped_oversized {
            dropped.record("rowTooLarge");
        }
        stats.dropped_records.push(dropped);
    }

    if run.timed_out {
        stats.status = EngineStatus::TimedOut;
        stats.reason = Some("maxMs".to_string());
        warn!(
            max_ms = ?caps.max_ms,
            discarded = run.flows.len(),
            "[risk] interprocedural propagation timed out; flows discarded"
        );
        return PropagationOutput::without_flows(stats);
    }

    let mut flows = std::mem::take(&mut run.flows);
    sort_flows(&mut flows);
    let risks: BTreeSet<&str> = flows.iter().map(|f| f.sink.rule_id.as_str()).collect();

    stats.status = EngineStatus::Ok;
    stats.counts.flows_emitted = flows.len();
    stats.counts.risks_with_flows = risks.len();
    stats.counts.unique_call_sites_referenced = run.call_site_ids.len();

    info!(
        status = stats.status.as_str(),
        roots = stats.counts.source_roots,
        flows = stats.counts.flows_emitted,
        caps_hit = stats.caps_hit.len(),
        elapsed_ms = stats.timing_ms.propagation,
        "Interprocedural propagation complete"
    );

    PropagationOutput {
        status: stats.status,
        flow_rows: flows,
        stats,
        call_site_ids_referenced: run.call_site_ids,
    }
}

/// Record references to the written `risk_summaries`, `risk_flows` and
/// call-site artifacts on the stats object
pub fn attach_artifact_refs(
    stats: &mut EngineStats,
    summaries: Option<ArtifactRef>,
    flows: Option<ArtifactRef>,
    call_sites: Option<ArtifactRef>,
) {
    stats.attach_artifact_refs(summaries, flows, call_sites);
}
