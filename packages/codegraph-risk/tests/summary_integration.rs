//! Summary rows built from extractor-shaped chunk JSON

mod common;

use codegraph_risk::config::InterproceduralState;
use codegraph_risk::features::risk_matching::Severity;
use codegraph_risk::features::risk_summary::{summarize, summarize_in_place, RuleType};
use codegraph_risk::shared::sha1_tagged;
use common::*;
use pretty_assertions::assert_eq;

fn enabled() -> InterproceduralState {
    InterproceduralState {
        enabled: true,
        summary_only: false,
    }
}

#[test]
fn test_rows_only_for_identified_chunks_with_signals() {
    let output = summarize(&web_app(), enabled());
    let uids: Vec<&str> = output.rows.iter().map(|r| r.chunk_uid.as_str()).collect();
    assert_eq!(
        uids,
        vec![
            "ck:handler",
            "ck:runQuery",
            "ck:logRequest",
            "ck:renderProfile",
            "ck:writeHtml"
        ]
    );
    assert_eq!(output.stats.candidates, 5);
    assert_eq!(output.stats.emitted, 5);
    assert_eq!(output.stats.summaries_dropped_by_size, 0);
    assert_rows_within_budget(&output.rows);
}

#[test]
fn test_lenient_fields_normalized() {
    let output = summarize(&web_app(), enabled());
    let handler = &output.rows[0];

    assert_eq!(handler.file, "routes/user.js");
    assert_eq!(handler.language_id.as_deref(), Some("javascript"));
    assert_eq!(handler.symbol.signature.as_deref(), Some("function handler(req, res)"));

    // the string entry in `sources` is skipped before counting
    assert_eq!(handler.totals.sources, 1);
    let source = &handler.signals.sources[0];
    assert_eq!(source.rule_type, RuleType::Source);
    // confidence must be a JSON number; the string "0.9" reads as unknown
    assert_eq!(source.confidence, None);
    assert_eq!(source.tags, vec!["http", "user-input"]);

    let evidence = &source.evidence[0];
    assert_eq!(evidence.file.as_deref(), Some("routes/user.js"));
    assert_eq!((evidence.start_line, evidence.start_col), (11, 15));
    assert_eq!((evidence.end_line, evidence.end_col), (11, 15));
    assert_eq!(
        evidence.snippet_hash.as_deref(),
        Some(sha1_tagged("const id = req.query.id").as_str())
    );

    let identifiers = handler.tainted_identifiers();
    assert!(identifiers.iter().any(|id| id == "req"));
    assert!(identifiers.iter().any(|id| id == "id"));
}

#[test]
fn test_sink_severity_and_sanitizer_lists() {
    let output = summarize(&web_app(), enabled());
    let rows = output.rows_by_uid();

    let run_query = rows["ck:runQuery"];
    assert_eq!(run_query.signals.sinks[0].severity, Some(Severity::Critical));
    assert_eq!(run_query.signals.sinks[0].evidence[0].start_line, 2);

    let render = rows["ck:renderProfile"];
    assert!(render.signals.sinks.is_empty());
    assert_eq!(render.signals.sanitizers[0].rule_id, "sanitizer.escape");
    assert_eq!(render.totals.sanitizers, 1);
}

#[test]
fn test_rollups_written_in_place() {
    let mut chunks = web_app();
    let output = summarize_in_place(&mut chunks, enabled());
    assert_eq!(output.rollups.len(), 5);

    let summary = chunks[2]
        .docmeta
        .risk
        .as_ref()
        .and_then(|risk| risk.summary.as_ref())
        .expect("runQuery rollup");
    assert_eq!(summary.sinks.count, 1);
    assert_eq!(summary.sinks.max_severity.as_deref(), Some("critical"));
    assert_eq!(summary.top_categories, vec!["injection"]);
    assert!(summary.interprocedural.enabled);
    assert!(!summary.interprocedural.summary_only);

    // chunks without signals stay untouched
    assert!(chunks[1].docmeta.risk.is_none());
}

#[test]
fn test_summary_rows_serialize_camel_case() {
    let output = summarize(&web_app(), enabled());
    let json = serde_json::to_value(&output.rows[0]).unwrap();
    assert_eq!(json["schemaVersion"], 1);
    assert_eq!(json["chunkUid"], "ck:handler");
    assert_eq!(json["signals"]["sources"][0]["ruleType"], "source");
    assert_eq!(json["signals"]["sources"][0]["severity"], serde_json::Value::Null);
    assert_eq!(json["totals"]["localFlows"], 0);
    assert!(json["taintHints"]["taintedIdentifiers"].is_array());
}

#[test]
fn test_null_sections_degrade_to_empty_chunks() {
    let raw = r#"[
        {"chunkUid": "ck:empty", "file": "a.js", "docmeta": null, "codeRelations": null},
        {"chunkUid": "ck:sink", "file": "b.js", "startLine": 1,
         "docmeta": {"risk": {"sinks": [{"ruleId": "sink.exec", "name": "Exec", "severity": "high"}]}},
         "codeRelations": {"callDetails": null}}
    ]"#;
    let chunks: Vec<codegraph_risk::RiskChunk> = serde_json::from_str(raw).unwrap();
    let output = summarize(&chunks, enabled());
    assert_eq!(output.rows.len(), 1);
    assert_eq!(output.rows[0].chunk_uid, "ck:sink");
    assert_eq!(output.stats.candidates, 1);
}
