//! Risk pipeline orchestrator
//!
//! summarize → propagate, once per indexing pass. The runtime is validated
//! up front; after that nothing in the pass can fail.

use std::time::Instant;

use tracing::{debug, info};

use super::result::RiskPipelineOutput;
use crate::config::{EmitArtifacts, RiskInterproceduralConfig, RiskRuntime};
use crate::errors::Result;
use crate::features::risk_summary::summarize;
use crate::features::taint_analysis::{propagate_with_clock, Clock, PropagateInput, SystemClock};
use crate::shared::models::RiskChunk;

/// Summarization + propagation for one build
#[derive(Debug, Clone)]
pub struct RiskPipeline {
    runtime: RiskRuntime,
}

impl RiskPipeline {
    /// Create a pipeline; fails if the configuration is out of range
    pub fn new(runtime: RiskRuntime) -> Result<Self> {
        runtime.config.validate()?;
        Ok(Self { runtime })
    }

    pub fn from_config(config: RiskInterproceduralConfig) -> Result<Self> {
        Self::new(RiskRuntime::new(config))
    }

    pub fn runtime(&self) -> &RiskRuntime {
        &self.runtime
    }

    /// True if the configuration asks for JSONL artifacts
    pub fn emits_artifacts(&self) -> bool {
        self.runtime.config.emit_artifacts == EmitArtifacts::Jsonl
    }

    /// Run both stages against the wall clock
    pub fn run(&self, chunks: &[RiskChunk]) -> RiskPipelineOutput {
        self.run_with_clock(chunks, SystemClock::start())
    }

    /// Run both stages; `clock` bounds propagation only
    pub fn run_with_clock<C: Clock>(&self, chunks: &[RiskChunk], clock: C) -> RiskPipelineOutput {
        let state = self.runtime.interprocedural_state();

        let started = Instant::now();
        let summarized = summarize(chunks, state);
        let summary_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(rows = summarized.rows.len(), summary_ms, "Summaries ready");

        let propagated = propagate_with_clock(
            PropagateInput::new(chunks, &summarized.rows, &self.runtime)
                .with_summary_timing(summary_ms),
            clock,
        );

        info!(
            mode = self.runtime.mode.as_str(),
            summaries = summarized.stats.emitted,
            dropped_by_size = summarized.stats.summaries_dropped_by_size,
            flows = propagated.flow_rows.len(),
            status = propagated.status.as_str(),
            "Risk pipeline complete"
        );

        RiskPipelineOutput {
            summary_rows: summarized.rows,
            rollups: summarized.rollups,
            summary_stats: summarized.stats,
            flow_rows: propagated.flow_rows,
            stats: propagated.stats,
            call_site_ids_referenced: propagated.call_site_ids_referenced,
        }
    }

    /// `run`, then write the rollups back onto `chunks`
    pub fn run_and_apply(&self, chunks: &mut [RiskChunk]) -> RiskPipelineOutput {
        let output = self.run(chunks);
        output.apply_rollups(chunks);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::errors::CodegraphRiskError;
    use crate::features::taint_analysis::{EngineStatus, ManualClock};
    use crate::shared::models::{CallDetail, RawRiskSignal, RiskPayload};

    fn chunks() -> Vec<RiskChunk> {
        vec![
            RiskChunk::new("a", "src/a.js", 1)
                .with_risk(RiskPayload {
                    sources: vec![RawRiskSignal::new("src.req", "Request")],
                    ..Default::default()
                })
                .with_call(CallDetail::new("exec", "b", 2, 1)),
            RiskChunk::new("b", "src/b.js", 1).with_risk(RiskPayload {
                sinks: vec![RawRiskSignal::new("sink.exec", "Exec").with_severity("critical")],
                ..Default::default()
            }),
        ]
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RiskInterproceduralConfig::disabled().summary_only(true);
        let err = RiskPipeline::from_config(config).unwrap_err();
        assert!(matches!(err, CodegraphRiskError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_run_end_to_end() {
        let pipeline = RiskPipeline::from_config(RiskInterproceduralConfig::default()).unwrap();
        let output = pipeline.run_with_clock(&chunks(), ManualClock::new());
        assert_eq!(output.status(), EngineStatus::Ok);
        assert_eq!(output.summary_rows.len(), 2);
        assert_eq!(output.flow_rows.len(), 1);
        assert_eq!(output.stats.counts.summaries_emitted, 2);
        assert_eq!(output.rollups.len(), 2);
    }

    #[test]
    fn test_run_and_apply_writes_rollups() {
        let pipeline = RiskPipeline::from_config(RiskInterproceduralConfig::default()).unwrap();
        let mut chunks = chunks();
        pipeline.run_and_apply(&mut chunks);
        let rollup = chunks[1].docmeta.risk.as_ref().unwrap().summary.as_ref().unwrap();
        assert_eq!(rollup.sinks.max_severity.as_deref(), Some("critical"));
        assert!(rollup.interprocedural.enabled);
    }

    #[test]
    fn test_write_streams_attaches_refs() {
        let pipeline = RiskPipeline::from_config(RiskInterproceduralConfig::default()).unwrap();
        assert!(pipeline.emits_artifacts());
        let mut output = pipeline.run_with_clock(&chunks(), ManualClock::new());

        let mut summaries = Vec::new();
        let mut flows = Vec::new();
        output.write_streams(&mut summaries, &mut flows).unwrap();

        assert_eq!(String::from_utf8(summaries).unwrap().lines().count(), 2);
        assert_eq!(String::from_utf8(flows).unwrap().lines().count(), 1);
        let refs = &output.stats.artifacts;
        assert_eq!(refs.risk_summaries.as_ref().unwrap().total_entries, 2);
        assert_eq!(refs.risk_flows.as_ref().unwrap().entrypoint, "risk_flows.jsonl");
        assert!(refs.call_sites.is_none());
    }
}
