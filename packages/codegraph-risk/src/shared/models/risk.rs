//! Raw risk payload attached to a chunk by the rule-matching pass
//!
//! Field names follow the upstream JSON (`ruleId`, `taintHints`, ...). The
//! only field this crate writes is `summary`, the compact rollup produced
//! during summarization.

use serde::{Deserialize, Serialize};

use super::lenient::{
    one_or_many, opt_integer, opt_number, opt_skip_invalid, string_list, vec_skip_invalid,
};

/// `docmeta.risk` of a chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskPayload {
    #[serde(deserialize_with = "vec_skip_invalid")]
    pub sources: Vec<RawRiskSignal>,
    #[serde(deserialize_with = "vec_skip_invalid")]
    pub sinks: Vec<RawRiskSignal>,
    #[serde(deserialize_with = "vec_skip_invalid")]
    pub sanitizers: Vec<RawRiskSignal>,
    #[serde(deserialize_with = "vec_skip_invalid")]
    pub flows: Vec<RawLocalFlow>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "opt_skip_invalid")]
    pub taint_hints: Option<TaintHints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CompactRiskSummary>,
}

impl RiskPayload {
    /// True if no list carries an entry
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
            && self.sinks.is_empty()
            && self.sanitizers.is_empty()
            && self.flows.is_empty()
    }
}

/// One matched rule as reported by the rule matcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRiskSignal {
    pub rule_id: Option<String>,
    /// Legacy alias for `ruleId`
    pub id: Option<String>,
    pub name: Option<String>,
    pub rule_type: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    #[serde(deserialize_with = "opt_number")]
    pub confidence: Option<f64>,
    #[serde(deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub evidence: Vec<RawEvidence>,
}

impl RawRiskSignal {
    /// Signal with the two identity fields set
    pub fn new(rule_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            rule_id: Some(rule_id.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_evidence(mut self, evidence: RawEvidence) -> Self {
        self.evidence.push(evidence);
        self
    }
}

/// Chunk-relative match location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvidence {
    #[serde(deserialize_with = "opt_integer")]
    pub line: Option<i64>,
    #[serde(deserialize_with = "opt_integer")]
    pub column: Option<i64>,
    pub excerpt: Option<String>,
}

impl RawEvidence {
    pub fn new(line: i64, column: i64, excerpt: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
            excerpt: Some(excerpt.into()),
        }
    }
}

/// Intra-function source→sink pairing reported by the rule matcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLocalFlow {
    #[serde(deserialize_with = "string_list")]
    pub rule_ids: Vec<String>,
    pub source: Option<String>,
    pub sink: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    #[serde(deserialize_with = "opt_number")]
    pub confidence: Option<f64>,
    #[serde(deserialize_with = "one_or_many")]
    pub evidence: Vec<RawEvidence>,
}

/// Identifiers the rule matcher saw carrying tainted data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaintHints {
    #[serde(deserialize_with = "string_list")]
    pub tainted_identifiers: Vec<String>,
}

/// Compact rollup written back to `docmeta.risk.summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactRiskSummary {
    pub sources: CompactCount,
    pub sinks: CompactSinks,
    pub sanitizers: CompactCount,
    pub local_flows: CompactCount,
    pub top_categories: Vec<String>,
    pub top_tags: Vec<String>,
    pub interprocedural: CompactInterprocedural,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactCount {
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactSinks {
    pub count: usize,
    pub max_severity: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactInterprocedural {
    pub enabled: bool,
    pub summary_only: bool,
}
