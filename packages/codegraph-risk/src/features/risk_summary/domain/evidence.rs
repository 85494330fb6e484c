//! Evidence locations
//!
//! Evidence is a single point, not a range: `endLine == startLine` and
//! `endCol == startCol`. Lines are absolute within the file.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Where a rule matched, with a hash of the matched excerpt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceLocation {
    pub file: Option<String>,
    pub start_line: i64,
    pub start_col: i64,
    pub end_line: i64,
    pub end_col: i64,
    pub snippet_hash: Option<String>,
}

impl EvidenceLocation {
    pub fn point(file: Option<String>, line: i64, col: i64, snippet_hash: Option<String>) -> Self {
        Self {
            file,
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
            snippet_hash,
        }
    }

    pub fn sort_key(&self) -> EvidenceKey<'_> {
        EvidenceKey::Located {
            file: self.file.as_deref().unwrap_or(""),
            start_line: self.start_line,
            start_col: self.start_col,
            end_line: self.end_line,
            end_col: self.end_col,
            snippet_hash: self.snippet_hash.as_deref().unwrap_or(""),
        }
    }

    /// Key of the first entry of an already-sorted list; empty lists sort last
    pub fn min_key(sorted: &[EvidenceLocation]) -> EvidenceKey<'_> {
        sorted.first().map_or(EvidenceKey::Missing, EvidenceLocation::sort_key)
    }
}

/// Total order over evidence: file, start, end, snippet hash; `Missing` last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceKey<'a> {
    Located {
        file: &'a str,
        start_line: i64,
        start_col: i64,
        end_line: i64,
        end_col: i64,
        snippet_hash: &'a str,
    },
    Missing,
}

impl Ord for EvidenceKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Missing, Self::Missing) => Ordering::Equal,
            (Self::Missing, _) => Ordering::Greater,
            (_, Self::Missing) => Ordering::Less,
            (
                Self::Located {
                    file: fa,
                    start_line: sla,
                    start_col: sca,
                    end_line: ela,
                    end_col: eca,
                    snippet_hash: ha,
                },
                Self::Located {
                    file: fb,
                    start_line: slb,
                    start_col: scb,
                    end_line: elb,
                    end_col: ecb,
                    snippet_hash: hb,
                },
            ) => (fa, sla, sca, ela, eca, ha).cmp(&(fb, slb, scb, elb, ecb, hb)),
        }
    }
}

impl PartialOrd for EvidenceKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
