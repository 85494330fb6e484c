//! Custom assertions for risk rows and flows

use codegraph_risk::features::risk_summary::{RiskSummaryRow, MAX_ROW_BYTES};
use codegraph_risk::features::taint_analysis::FlowRecord;

/// Assert a flow exists along exactly this chunk path
pub fn assert_has_flow_path(flows: &[FlowRecord], path: &[&str]) {
    assert!(
        flows.iter().any(|flow| flow.path.chunk_uids == path),
        "Expected flow along {path:?}, got: {:?}",
        flows.iter().map(|f| &f.path.chunk_uids).collect::<Vec<_>>()
    );
}

/// Assert no flow reaches `sink_uid`
pub fn assert_no_flow_to(flows: &[FlowRecord], sink_uid: &str) {
    assert!(
        flows.iter().all(|flow| flow.sink.chunk_uid != sink_uid),
        "Expected no flow into '{sink_uid}'"
    );
}

/// Assert every structural property a flow row must satisfy
pub fn assert_flow_well_formed(flow: &FlowRecord) {
    let uids = &flow.path.chunk_uids;
    assert!(uids.len() >= 2, "Flow path too short: {uids:?}");
    assert_eq!(uids.first(), Some(&flow.source.chunk_uid));
    assert_eq!(uids.last(), Some(&flow.sink.chunk_uid));
    assert_eq!(flow.path.call_site_ids_by_step.len(), uids.len() - 1);
    assert_eq!(flow.notes.hop_count, uids.len() - 1);
    assert!(flow.source.severity.is_none());
    assert!(
        (0.05..=1.0).contains(&flow.confidence),
        "Confidence out of range: {}",
        flow.confidence
    );
    assert!(flow.flow_id.starts_with("sha1:"), "Bad flow id: {}", flow.flow_id);
    assert!(flow.serialized_len() <= MAX_ROW_BYTES);
}

/// Assert flows are in canonical output order
pub fn assert_flows_sorted(flows: &[FlowRecord]) {
    let keys: Vec<_> = flows
        .iter()
        .map(|f| {
            (
                f.source.chunk_uid.clone(),
                f.source.rule_id.clone(),
                f.sink.chunk_uid.clone(),
                f.sink.rule_id.clone(),
                f.path.chunk_uids.join("\0"),
                f.flow_id.clone(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted, "Flows are not in canonical order");
}

/// Assert every summary row fits the row budget
pub fn assert_rows_within_budget(rows: &[RiskSummaryRow]) {
    for row in rows {
        assert!(row.serialized_len() <= MAX_ROW_BYTES, "Row {} too large", row.chunk_uid);
    }
}
