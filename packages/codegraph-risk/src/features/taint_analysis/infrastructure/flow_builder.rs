//! Flow identity, confidence and row trimming

use std::collections::BTreeSet;

use crate::config::SanitizerPolicy;
use crate::features::taint_analysis::domain::FlowRecord;
use crate::shared::utils::sha1_tagged;

const DEFAULT_CONFIDENCE: f64 = 0.5;
const HOP_DECAY: f64 = 0.85;
const SANITIZER_DECAY: f64 = 0.9;
const MIN_CONFIDENCE: f64 = 0.05;
const TAINT_KEY_LIMIT: usize = 16;

/// `sha1(srcUid|srcRule|sinkUid|sinkRule|path joined by '>')`
pub fn build_flow_id(
    source_chunk_uid: &str,
    source_rule_id: &str,
    sink_chunk_uid: &str,
    sink_rule_id: &str,
    path_chunk_uids: &[String],
) -> String {
    sha1_tagged(&format!(
        "{}|{}|{}|{}|{}",
        source_chunk_uid,
        source_rule_id,
        sink_chunk_uid,
        sink_rule_id,
        path_chunk_uids.join(">")
    ))
}

/// Geometric mean of endpoint confidences, decayed per hop and per sanitizer
/// crossed under `weaken`, clamped to `[0.05, 1]`
pub fn flow_confidence(
    source: Option<f64>,
    sink: Option<f64>,
    hop_count: usize,
    sanitizer_barriers_hit: usize,
    policy: SanitizerPolicy,
) -> f64 {
    let source = source.filter(|c| c.is_finite()).unwrap_or(DEFAULT_CONFIDENCE);
    let sink = sink.filter(|c| c.is_finite()).unwrap_or(DEFAULT_CONFIDENCE);
    let mut score = (source.max(0.0) * sink.max(0.0)).sqrt();
    score *= HOP_DECAY.powi(i32::try_from(hop_count).unwrap_or(i32::MAX));
    if policy == SanitizerPolicy::Weaken && sanitizer_barriers_hit > 0 {
        score *= SANITIZER_DECAY.powi(i32::try_from(sanitizer_barriers_hit).unwrap_or(i32::MAX));
    }
    score.clamp(MIN_CONFIDENCE, 1.0)
}

/// Trimmed, unique, sorted identifiers (first 16) joined by `,`
pub fn taint_set_key<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(TAINT_KEY_LIMIT)
        .collect::<Vec<_>>()
        .join(",")
}

/// Fit a flow under `max_bytes` by keeping one call site per hop, then none;
/// false if it still does not fit
pub fn trim_flow_row(flow: &mut FlowRecord, max_bytes: usize) -> bool {
    if flow.serialized_len() <= max_bytes {
        return true;
    }
    for step in flow.path.call_site_ids_by_step.iter_mut() {
        step.truncate(1);
    }
    if flow.serialized_len() <= max_bytes {
        return true;
    }
    for step in flow.path.call_site_ids_by_step.iter_mut() {
        step.clear();
    }
    flow.serialized_len() <= max_bytes
}
