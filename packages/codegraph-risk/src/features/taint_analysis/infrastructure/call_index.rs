/*
 * Call Index
 *
 * Lookup tables built once per run from the chunk set and summary rows:
 * - summary_by_uid / chunk_by_uid
 * - param names per (caller, callee) edge, from resolved call summaries
 * - call details grouped caller → callee (callees kept sorted)
 *
 * Only call details with a `targetChunkUid` form edges.
 */

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::features::risk_summary::RiskSummaryRow;
use crate::shared::models::{CallDetail, RiskChunk};

/// Callee uid → call details at that caller
pub type CalleeDetails<'a> = BTreeMap<&'a str, Vec<&'a CallDetail>>;

#[derive(Debug, Default)]
pub struct CallIndex<'a> {
    summary_by_uid: FxHashMap<&'a str, &'a RiskSummaryRow>,
    chunk_by_uid: FxHashMap<&'a str, &'a RiskChunk>,
    param_names_by_edge: FxHashMap<(&'a str, &'a str), Vec<&'a str>>,
    details_by_caller: FxHashMap<&'a str, CalleeDetails<'a>>,
    edge_count: usize,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl<'a> CallIndex<'a> {
    pub fn build(chunks: &'a [RiskChunk], summaries: &'a [RiskSummaryRow]) -> Self {
        let mut index = Self::default();

        for row in summaries {
            if !row.chunk_uid.is_empty() {
                index.summary_by_uid.insert(row.chunk_uid.as_str(), row);
            }
        }

        for chunk in chunks {
            let Some(caller) = chunk.uid() else {
                continue;
            };
            index.chunk_by_uid.insert(caller, chunk);

            for summary in &chunk.code_relations.call_summaries {
                let Some(callee) = non_empty(summary.resolved_callee_chunk_uid.as_ref())
                    .or_else(|| non_empty(summary.target_chunk_uid.as_ref()))
                else {
                    continue;
                };
                let params: Vec<&str> = summary
                    .params
                    .iter()
                    .map(String::as_str)
                    .filter(|p| !p.is_empty())
                    .collect();
                if !params.is_empty() {
                    index.param_names_by_edge.insert((caller, callee), params);
                }
            }

            for detail in &chunk.code_relations.call_details {
                let Some(callee) = non_empty(detail.target_chunk_uid.as_ref()) else {
                    continue;
                };
                let callees = index.details_by_caller.entry(caller).or_default();
                let list = callees.entry(callee).or_default();
                if list.is_empty() {
                    index.edge_count += 1;
                }
                list.push(detail);
            }
        }

        debug!(
            summaries = index.summary_by_uid.len(),
            chunks = index.chunk_by_uid.len(),
            edges = index.edge_count,
            "Call index built"
        );
        index
    }

    pub fn summary(&self, uid: &str) -> Option<&'a RiskSummaryRow> {
        self.summary_by_uid.get(uid).copied()
    }

    pub fn chunk(&self, uid: &str) -> Option<&'a RiskChunk> {
        self.chunk_by_uid.get(uid).copied()
    }

    /// Unique summary rows, sorted by chunk uid
    pub fn summaries_sorted(&self) -> Vec<&'a RiskSummaryRow> {
        let mut rows: Vec<&'a RiskSummaryRow> = self.summary_by_uid.values().copied().collect();
        rows.sort_by(|a, b| a.chunk_uid.cmp(&b.chunk_uid));
        rows
    }

    pub fn summary_count(&self) -> usize {
        self.summary_by_uid.len()
    }

    /// Distinct resolved (caller, callee) edges
    pub fn resolved_edges(&self) -> usize {
        self.edge_count
    }

    /// Callees of `caller` in lexicographic order, with their call details
    pub fn callees(&self, caller: &str) -> Option<&CalleeDetails<'a>> {
        self.details_by_caller.get(caller)
    }

    /// Parameter names of `callee` as seen from `caller`
    ///
    /// Edge params from call summaries win; otherwise the callee chunk's
    /// `paramNames`, then its `params`.
    pub fn param_names(&self, caller: &'a str, callee: &'a str) -> Vec<&'a str> {
        if let Some(params) = self.param_names_by_edge.get(&(caller, callee)) {
            return params.clone();
        }
        let Some(chunk) = self.chunk(callee) else {
            return Vec::new();
        };
        let docmeta = &chunk.docmeta;
        let names = if docmeta.param_names.is_empty() {
            &docmeta.params
        } else {
            &docmeta.param_names
        };
        names
            .iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::CallSummary;

    fn chunks() -> Vec<RiskChunk> {
        let mut legacy = RiskChunk::new("c", "src/c.js", 1);
        legacy.docmeta.params = vec!["legacy".to_string()];
        vec![
            RiskChunk::new("a", "src/a.js", 1)
                .with_call(CallDetail::new("c", "c", 2, 1))
                .with_call(CallDetail::new("b", "b", 3, 1))
                .with_call(CallDetail::new("b", "b", 4, 1))
                .with_call(CallDetail::new("unresolved", "", 5, 1))
                .with_call_summary(CallSummary::new("b", ["edgeParam"])),
            RiskChunk::new("b", "src/b.js", 1).with_params(["doc"]),
            legacy,
        ]
    }

    #[test]
    fn test_edges_grouped_and_sorted() {
        let chunks = chunks();
        let index = CallIndex::build(&chunks, &[]);
        assert_eq!(index.resolved_edges(), 2);
        let callees = index.callees("a").unwrap();
        let order: Vec<&str> = callees.keys().copied().collect();
        assert_eq!(order, vec!["b", "c"]);
        assert_eq!(callees["b"].len(), 2);
        assert!(index.callees("b").is_none());
    }

    #[test]
    fn test_param_name_fallbacks() {
        let chunks = chunks();
        let index = CallIndex::build(&chunks, &[]);
        assert_eq!(index.param_names("a", "b"), vec!["edgeParam"]);
        assert_eq!(index.param_names("x", "b"), vec!["doc"]);
        assert_eq!(index.param_names("a", "c"), vec!["legacy"]);
        assert!(index.param_names("a", "missing").is_empty());
    }
}
