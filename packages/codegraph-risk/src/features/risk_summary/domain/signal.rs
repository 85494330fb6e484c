//! Normalized signals and local flows

use serde::{Deserialize, Serialize};

use super::evidence::{EvidenceKey, EvidenceLocation};
use crate::features::risk_matching::Severity;

/// Which list a signal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Source,
    Sink,
    Sanitizer,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Sink => "sink",
            Self::Sanitizer => "sanitizer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "source" => Some(Self::Source),
            "sink" => Some(Self::Sink),
            "sanitizer" => Some(Self::Sanitizer),
            _ => None,
        }
    }
}

/// A source, sink or sanitizer match on one chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSignal {
    pub rule_id: String,
    pub rule_name: String,
    pub rule_type: RuleType,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub confidence: Option<f64>,
    pub tags: Vec<String>,
    pub evidence: Vec<EvidenceLocation>,
}

impl RiskSignal {
    pub fn severity_rank(&self) -> u8 {
        self.severity.map_or(0, Severity::rank)
    }

    pub fn min_evidence_key(&self) -> EvidenceKey<'_> {
        EvidenceLocation::min_key(&self.evidence)
    }
}

/// Intra-function source→sink pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFlow {
    pub source_rule_id: String,
    pub sink_rule_id: String,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub confidence: Option<f64>,
    pub evidence: Vec<EvidenceLocation>,
}

impl LocalFlow {
    pub fn min_evidence_key(&self) -> EvidenceKey<'_> {
        EvidenceLocation::min_key(&self.evidence)
    }
}
