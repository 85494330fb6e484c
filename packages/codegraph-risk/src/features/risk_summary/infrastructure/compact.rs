//! Compact chunk rollup
//!
//! Counts come from the raw payload, before normalization or caps, so the
//! rollup reflects everything the rule matcher reported.

use rustc_hash::FxHashMap;

use crate::config::InterproceduralState;
use crate::features::risk_matching::severity_rank;
use crate::shared::models::{
    CompactCount, CompactInterprocedural, CompactRiskSummary, CompactSinks, RawRiskSignal,
    RiskPayload,
};

const TOP_CATEGORIES: usize = 5;
const TOP_TAGS: usize = 8;

fn max_severity(sinks: &[RawRiskSignal]) -> Option<String> {
    let mut best: Option<&str> = None;
    let mut best_rank = 0;
    for severity in sinks.iter().filter_map(|s| s.severity.as_deref()) {
        let rank = severity_rank(Some(severity));
        if rank > best_rank {
            best_rank = rank;
            best = Some(severity);
        }
    }
    best.map(str::to_string)
}

/// Keys by descending count, ties broken lexicographically
fn top_entries(counts: FxHashMap<&str, usize>, limit: usize) -> Vec<String> {
    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Rollup for `docmeta.risk.summary`; `None` when the payload is empty
pub fn build_compact_summary(
    risk: &RiskPayload,
    state: InterproceduralState,
) -> Option<CompactRiskSummary> {
    if risk.is_empty() {
        return None;
    }

    let mut categories: FxHashMap<&str, usize> = FxHashMap::default();
    let mut tags: FxHashMap<&str, usize> = FxHashMap::default();
    for signal in risk.sources.iter().chain(&risk.sinks).chain(&risk.sanitizers) {
        if let Some(category) = signal.category.as_deref().filter(|c| !c.is_empty()) {
            *categories.entry(category).or_default() += 1;
        }
        for tag in signal.tags.iter().filter(|t| !t.is_empty()) {
            *tags.entry(tag.as_str()).or_default() += 1;
        }
    }

    Some(CompactRiskSummary {
        sources: CompactCount {
            count: risk.sources.len(),
        },
        sinks: CompactSinks {
            count: risk.sinks.len(),
            max_severity: max_severity(&risk.sinks),
        },
        sanitizers: CompactCount {
            count: risk.sanitizers.len(),
        },
        local_flows: CompactCount {
            count: risk.flows.len(),
        },
        top_categories: top_entries(categories, TOP_CATEGORIES),
        top_tags: top_entries(tags, TOP_TAGS),
        interprocedural: CompactInterprocedural {
            enabled: state.enabled,
            summary_only: state.summary_only,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> InterproceduralState {
        InterproceduralState {
            enabled: true,
            summary_only: false,
        }
    }

    #[test]
    fn test_empty_payload_has_no_rollup() {
        assert!(build_compact_summary(&RiskPayload::default(), state()).is_none());
    }

    #[test]
    fn test_counts_and_max_severity() {
        let risk = RiskPayload {
            sources: vec![RawRiskSignal::new("s", "S").with_category("input")],
            sinks: vec![
                RawRiskSignal::new("k1", "K1").with_severity("medium"),
                RawRiskSignal::new("k2", "K2").with_severity("critical"),
                RawRiskSignal::new("k3", "K3").with_severity("extreme"),
            ],
            ..Default::default()
        };
        let compact = build_compact_summary(&risk, state()).unwrap();
        assert_eq!(compact.sources.count, 1);
        assert_eq!(compact.sinks.count, 3);
        assert_eq!(compact.sinks.max_severity.as_deref(), Some("critical"));
        assert_eq!(compact.local_flows.count, 0);
        assert!(compact.interprocedural.enabled);
    }

    #[test]
    fn test_top_entries_order() {
        let sig = |id: &str, category: &str, tags: &[&str]| {
            RawRiskSignal::new(id, id)
                .with_category(category)
                .with_tags(tags.iter().copied())
        };
        let risk = RiskPayload {
            sources: vec![
                sig("a", "xss", &["web", "dom"]),
                sig("b", "sqli", &["db"]),
                sig("c", "sqli", &["db", "web"]),
            ],
            sinks: vec![sig("d", "cmd", &["shell"]), sig("e", "auth", &[])],
            sanitizers: vec![sig("f", "path", &[]), sig("g", "zeta", &[])],
            ..Default::default()
        };
        let compact = build_compact_summary(&risk, state()).unwrap();
        assert_eq!(
            compact.top_categories,
            vec!["sqli", "auth", "cmd", "path", "xss"]
        );
        assert_eq!(compact.top_tags, vec!["db", "web", "dom", "shell"]);
        assert_eq!(compact.sinks.max_severity, None);
    }
}
