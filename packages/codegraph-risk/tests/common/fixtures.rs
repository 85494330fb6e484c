//! Test fixtures
//!
//! A small web-handler call graph in the JSON shape the extraction pipeline
//! produces, including a few of the lenient encodings upstream extractors use
//! (numeric strings, single-object evidence, junk list entries).

use codegraph_risk::config::{IndexMode, RiskInterproceduralConfig, RiskRuntime};
use codegraph_risk::shared::models::RiskChunk;

/// `handler` reads the request and calls into three subsystems:
///
/// ```text
/// handler ──► loadUser ──► runQuery      (sink.sql.query, critical)
///    ├──────► logRequest                 (sink.log.write, low)
///    └──────► renderProfile ──► writeHtml (sanitizer, then sink.xss.write)
/// ```
pub const WEB_APP_JSON: &str = r#"[
  {
    "chunkUid": "ck:handler",
    "file": "routes\\user.js",
    "name": "handler",
    "kind": "function",
    "startLine": 10,
    "lang": "javascript",
    "docmeta": {
      "signature": "function handler(req, res)",
      "paramNames": ["req", "res"],
      "risk": {
        "sources": [
          {
            "ruleId": "source.req.query",
            "name": "Request query",
            "category": "input",
            "confidence": "0.9",
            "tags": ["http", "user-input", "http"],
            "evidence": { "line": 2, "column": 15, "excerpt": "const id = req.query.id" }
          },
          "not a signal"
        ],
        "taintHints": { "taintedIdentifiers": ["id", "req", 7, null] }
      }
    },
    "codeRelations": {
      "callDetails": [
        {
          "calleeRaw": "db.loadUser",
          "targetChunkUid": "ck:loadUser",
          "startLine": "12", "startCol": 3, "endLine": 12, "endCol": 20,
          "args": ["req.query.id"]
        },
        {
          "calleeRaw": "logger.logRequest",
          "targetChunkUid": "ck:logRequest",
          "startLine": 13, "startCol": 3, "endLine": 13, "endCol": 25,
          "args": ["req"]
        },
        {
          "calleeRaw": "views.renderProfile",
          "targetChunkUid": "ck:renderProfile",
          "startLine": 14, "startCol": 3, "endLine": 14, "endCol": 30,
          "args": ["profile.name"]
        },
        42
      ]
    }
  },
  {
    "chunkUid": "ck:loadUser",
    "file": "db/user.js",
    "name": "loadUser",
    "kind": "function",
    "startLine": 1,
    "docmeta": { "paramNames": ["userId"] },
    "codeRelations": {
      "callDetails": [
        {
          "calleeRaw": "runQuery",
          "targetChunkUid": "ck:runQuery",
          "startLine": 3, "startCol": 10, "endLine": 3, "endCol": 60,
          "args": ["`SELECT * FROM users WHERE id = ${userId}`"]
        }
      ]
    }
  },
  {
    "chunkUid": "ck:runQuery",
    "file": "db/query.js",
    "name": "runQuery",
    "kind": "function",
    "startLine": 1,
    "docmeta": {
      "paramNames": ["sql"],
      "risk": {
        "sinks": [
          {
            "ruleId": "sink.sql.query",
            "name": "SQL query",
            "category": "injection",
            "severity": "critical",
            "confidence": 0.8,
            "evidence": [{ "line": 2, "column": 3, "excerpt": "pool.query(sql)" }]
          }
        ]
      }
    }
  },
  {
    "chunkUid": "ck:logRequest",
    "file": "util/log.js",
    "name": "logRequest",
    "kind": "function",
    "startLine": 1,
    "docmeta": {
      "paramNames": ["r"],
      "risk": {
        "sinks": [
          { "ruleId": "sink.log.write", "name": "Log write", "category": "logging", "severity": "low" }
        ]
      }
    }
  },
  {
    "chunkUid": "ck:renderProfile",
    "file": "views/profile.js",
    "name": "renderProfile",
    "kind": "function",
    "startLine": 1,
    "docmeta": {
      "paramNames": ["name"],
      "risk": {
        "sanitizers": [
          { "ruleId": "sanitizer.escape", "name": "HTML escape", "category": "xss" }
        ]
      }
    },
    "codeRelations": {
      "callDetails": [
        {
          "calleeRaw": "writeHtml",
          "targetChunkUid": "ck:writeHtml",
          "startLine": 4, "startCol": 3, "endLine": 4, "endCol": 22,
          "args": ["escape(name)"]
        }
      ]
    }
  },
  {
    "chunkUid": "ck:writeHtml",
    "file": "views/html.js",
    "name": "writeHtml",
    "kind": "function",
    "startLine": 1,
    "docmeta": {
      "paramNames": ["html"],
      "risk": {
        "sinks": [
          { "ruleId": "sink.xss.write", "name": "HTML write", "category": "xss", "severity": "high" }
        ]
      }
    }
  },
  {
    "file": "orphan.js",
    "docmeta": { "risk": { "sources": [{ "ruleId": "source.env" }] } }
  }
]"#;

/// Parse the web-app fixture
pub fn web_app() -> Vec<RiskChunk> {
    serde_json::from_str(WEB_APP_JSON).expect("fixture parses")
}

/// Runtime for code mode with the given config
pub fn code_runtime(config: RiskInterproceduralConfig) -> RiskRuntime {
    RiskRuntime::new(config).with_mode(IndexMode::Code)
}

/// Default config with no deadline, so slow CI machines never time out
pub fn no_deadline() -> RiskInterproceduralConfig {
    RiskInterproceduralConfig::default().max_ms(None)
}
