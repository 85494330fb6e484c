//! Interprocedural propagation over the web-app fixture and built graphs

mod common;

use codegraph_risk::config::{IndexMode, SanitizerPolicy, Strictness};
use codegraph_risk::features::risk_summary::summarize;
use codegraph_risk::features::taint_analysis::{
    propagate, propagate_with_clock, CapKind, EngineStatus, ManualClock, PropagateInput,
    PropagationOutput,
};
use codegraph_risk::{RiskChunk, RiskInterproceduralConfig};
use common::*;
use pretty_assertions::assert_eq;

fn run(chunks: &[RiskChunk], config: RiskInterproceduralConfig) -> PropagationOutput {
    let runtime = code_runtime(config);
    let summaries = summarize(chunks, runtime.interprocedural_state()).rows;
    propagate_with_clock(
        PropagateInput::new(chunks, &summaries, &runtime),
        ManualClock::new(),
    )
}

#[test]
fn test_conservative_terminate() {
    let output = run(&web_app(), no_deadline());
    assert_eq!(output.status, EngineStatus::Ok);
    assert_eq!(output.flow_rows.len(), 2);
    assert_has_flow_path(&output.flow_rows, &["ck:handler", "ck:logRequest"]);
    assert_has_flow_path(&output.flow_rows, &["ck:handler", "ck:loadUser", "ck:runQuery"]);
    assert_no_flow_to(&output.flow_rows, "ck:writeHtml");
    assert_flows_sorted(&output.flow_rows);
    output.flow_rows.iter().for_each(assert_flow_well_formed);

    let sql = &output.flow_rows[1];
    assert_eq!(sql.sink.rule_id, "sink.sql.query");
    assert_eq!(sql.source.rule_id, "source.req.query");
    assert_eq!(sql.notes.strictness, Strictness::Conservative);
    assert_eq!(sql.notes.hop_count, 2);
    assert!(sql.path.call_site_ids_by_step.iter().all(|step| step.len() == 1));
}

#[test]
fn test_weaken_crosses_sanitizer() {
    let config = no_deadline().sanitizer_policy(SanitizerPolicy::Weaken);
    let output = run(&web_app(), config);
    assert_eq!(output.flow_rows.len(), 3);
    let xss = output
        .flow_rows
        .iter()
        .find(|f| f.sink.chunk_uid == "ck:writeHtml")
        .expect("flow through the sanitizer");
    assert_eq!(xss.notes.sanitizer_barriers_hit, 1);
    assert_eq!(xss.notes.sanitizer_policy, SanitizerPolicy::Weaken);
    assert_flow_well_formed(xss);
}

#[test]
fn test_arg_aware_follows_tainted_arguments_only() {
    let config = no_deadline()
        .strictness(Strictness::ArgAware)
        .sanitizer_policy(SanitizerPolicy::Weaken);
    let output = run(&web_app(), config);
    // `profile.name` carries no tainted identifier, so renderProfile is never entered
    assert_eq!(output.flow_rows.len(), 2);
    assert_no_flow_to(&output.flow_rows, "ck:writeHtml");
    assert_has_flow_path(&output.flow_rows, &["ck:handler", "ck:loadUser", "ck:runQuery"]);
}

#[test]
fn test_call_site_ids_referenced_match_flows() {
    let output = run(&web_app(), no_deadline());
    let from_flows: std::collections::BTreeSet<String> = output
        .flow_rows
        .iter()
        .flat_map(|f| f.call_site_ids().map(str::to_string))
        .collect();
    assert_eq!(output.call_site_ids_referenced, from_flows);
    assert_eq!(output.stats.counts.unique_call_sites_referenced, from_flows.len());
    assert_eq!(from_flows.len(), 3);
}

#[test]
fn test_stats_counts() {
    let output = run(&web_app(), no_deadline());
    let counts = &output.stats.counts;
    assert_eq!(counts.chunks_considered, 5);
    assert_eq!(counts.summaries_emitted, 5);
    assert_eq!(counts.source_roots, 1);
    assert_eq!(counts.resolved_edges, 5);
    assert_eq!(counts.flows_emitted, 2);
    assert_eq!(output.stats.mode, "code");
    assert!(output.stats.caps_hit.is_empty());
}

#[test]
fn test_prose_mode_disabled() {
    let chunks = web_app();
    let runtime = code_runtime(no_deadline()).with_mode(IndexMode::ExtractedProse);
    let summaries = summarize(&chunks, runtime.interprocedural_state()).rows;
    let output = propagate(PropagateInput::new(&chunks, &summaries, &runtime));
    assert_eq!(output.status, EngineStatus::Disabled);
    assert!(output.flow_rows.is_empty());
}

#[test]
fn test_long_chain_hits_depth_cap() {
    let chunks = GraphBuilder::chain(&["a", "b", "c", "d", "e", "f"]).build();
    let shallow = run(&chunks, no_deadline().max_depth(3));
    assert!(shallow.flow_rows.is_empty());
    assert!(shallow.stats.caps_hit.contains(&CapKind::MaxDepth));

    let deep = run(&chunks, no_deadline().max_depth(5));
    assert_eq!(deep.flow_rows.len(), 1);
    assert_eq!(deep.flow_rows[0].notes.hop_count, 5);
}

#[test]
fn test_layered_graph_caps() {
    let chunks = layered_graph(3, 3);
    // converging routes into a sink share a visit key: one flow per (root, sink)
    let full = run(&chunks, no_deadline());
    assert_eq!(full.flow_rows.len(), 9);
    assert!(full.stats.caps_hit.is_empty());
    full.flow_rows.iter().for_each(assert_flow_well_formed);

    let limited = run(&chunks, no_deadline().max_total_flows(4));
    assert_eq!(limited.flow_rows.len(), 4);
    assert!(limited.stats.caps_hit.contains(&CapKind::MaxTotalFlows));
    assert_flows_sorted(&limited.flow_rows);

    let budget = run(&chunks, no_deadline().max_edge_expansions(2));
    assert!(budget.stats.caps_hit.contains(&CapKind::MaxEdgeExpansions));
    assert!(budget.flow_rows.len() < 9);
}
