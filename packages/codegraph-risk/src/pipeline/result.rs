//! Pipeline result

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::time::Instant;

use super::jsonl::write_jsonl;
use crate::errors::Result;
use crate::features::risk_summary::{apply_rollups, RiskSummaryRow, SummaryStats};
use crate::features::taint_analysis::{ArtifactRef, EngineStats, EngineStatus, FlowRecord};
use crate::shared::models::{CompactRiskSummary, RiskChunk};

pub const SUMMARIES_ARTIFACT: &str = "risk_summaries";
pub const FLOWS_ARTIFACT: &str = "risk_flows";

/// Summary rows, rollups, flows and stats of one pass
#[derive(Debug, Clone)]
pub struct RiskPipelineOutput {
    pub summary_rows: Vec<RiskSummaryRow>,
    pub rollups: BTreeMap<String, CompactRiskSummary>,
    pub summary_stats: SummaryStats,
    pub flow_rows: Vec<FlowRecord>,
    pub stats: EngineStats,
    pub call_site_ids_referenced: BTreeSet<String>,
}

impl RiskPipelineOutput {
    pub fn status(&self) -> EngineStatus {
        self.stats.status
    }

    /// Write rollups onto `docmeta.risk.summary` of matching chunks
    pub fn apply_rollups(&self, chunks: &mut [RiskChunk]) -> usize {
        apply_rollups(&self.rollups, chunks)
    }

    /// Stream both row sets as JSONL and record artifact refs and io time
    pub fn write_streams<S, F>(&mut self, summaries: S, flows: F) -> Result<()>
    where
        S: Write,
        F: Write,
    {
        let started = Instant::now();
        let written_summaries = write_jsonl(&self.summary_rows, summaries)?;
        let written_flows = write_jsonl(&self.flow_rows, flows)?;

        self.stats.attach_artifact_refs(
            Some(ArtifactRef::jsonl(
                SUMMARIES_ARTIFACT,
                false,
                format!("{}.jsonl", SUMMARIES_ARTIFACT),
                written_summaries.rows,
            )),
            Some(ArtifactRef::jsonl(
                FLOWS_ARTIFACT,
                false,
                format!("{}.jsonl", FLOWS_ARTIFACT),
                written_flows.rows,
            )),
            None,
        );
        self.stats.timing_ms.io += u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.stats.timing_ms.recompute_total();
        Ok(())
    }
}
