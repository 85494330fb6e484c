/*
 * Worklist Propagation Engine
 *
 * Breadth-first search from every source root over resolved call edges.
 *
 * Per dequeued state:
 * 1. Deadline check (maxMs); a timed-out run keeps no flows
 * 2. Sinks at non-root nodes become flows (maxPathsPerPair, maxTotalFlows)
 * 3. Depth cap (maxDepth)
 * 4. Sanitizer barrier (terminate policy stops expansion)
 * 5. Callee expansion in lexicographic order (maxEdgeExpansions), gated by
 *    argument taint under argAware, deduplicated by visit key
 *
 * The visit key is (root chunk, root rule, node, taint key, depth), so a node
 * can be revisited under a different taint state but never twice under the
 * same one.
 */

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use super::call_index::CallIndex;
use super::call_sites::sample_call_sites;
use super::clock::Clock;
use super::flow_builder::{build_flow_id, flow_confidence, taint_set_key, trim_flow_row};
use crate::config::{SanitizerPolicy, Strictness};
use crate::features::risk_matching::{
    contains_identifier, match_rule_patterns, LineLowerCache, SourceRule,
};
use crate::features::risk_summary::{RiskSignal, RiskSummaryRow, RuleType, MAX_ROW_BYTES};
use crate::features::taint_analysis::domain::{
    CapKind, CapsHit, EffectiveCaps, FlowEndpoint, FlowNotes, FlowPath, FlowRecord, RootSource,
    StateId, TraversalArena, TraversalState, FLOW_SCHEMA_VERSION,
};

type VisitKey<'a> = (&'a str, &'a str, &'a str, String, usize);
type PairKey<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Raw outcome of one traversal; flows are in discovery order
#[derive(Debug, Default)]
pub struct EngineRun {
    pub flows: Vec<FlowRecord>,
    pub caps_hit: CapsHit,
    pub timed_out: bool,
    pub source_roots: usize,
    pub dropped_oversized: usize,
    pub call_site_ids: BTreeSet<String>,
    pub states_processed: usize,
    pub edge_expansions: usize,
    pub elapsed_ms: u64,
}

impl EngineRun {
    fn cap(&mut self, cap: CapKind) {
        self.caps_hit.insert(cap);
    }

    fn flows_full(&self, caps: &EffectiveCaps) -> bool {
        caps.max_total_flows.is_some_and(|max| self.flows.len() >= max)
    }
}

/// True if the argument text mentions a tainted identifier or matches a
/// configured source rule
fn is_arg_tainted(arg: &str, taint_list: &[String], rules: &[SourceRule]) -> bool {
    let text = arg.trim();
    if text.is_empty() {
        return false;
    }
    if taint_list.iter().any(|name| contains_identifier(text, name)) {
        return true;
    }
    let mut lower = LineLowerCache::new();
    rules
        .iter()
        .any(|rule| match_rule_patterns(text, rule, Some(&mut lower)).is_some())
}

fn sorted_sinks(summary: &RiskSummaryRow) -> Vec<&RiskSignal> {
    let mut sinks: Vec<&RiskSignal> = summary
        .signals
        .sinks
        .iter()
        .filter(|sink| !sink.rule_id.is_empty())
        .collect();
    sinks.sort_by(|a, b| {
        b.severity_rank()
            .cmp(&a.severity_rank())
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
    sinks
}

fn endpoint(chunk_uid: &str, signal: &RiskSignal, rule_type: RuleType) -> FlowEndpoint {
    let rule_name = if signal.rule_name.is_empty() {
        signal.rule_id.clone()
    } else {
        signal.rule_name.clone()
    };
    FlowEndpoint {
        chunk_uid: chunk_uid.to_string(),
        rule_id: signal.rule_id.clone(),
        rule_name,
        rule_type,
        category: signal.category.clone(),
        severity: match rule_type {
            RuleType::Source => None,
            _ => signal.severity,
        },
        confidence: signal.confidence.filter(|c| c.is_finite()),
    }
}

pub struct PropagationEngine<'a, C: Clock> {
    index: &'a CallIndex<'a>,
    strictness: Strictness,
    sanitizer_policy: SanitizerPolicy,
    caps: EffectiveCaps,
    source_rules: &'a [SourceRule],
    clock: C,
}

impl<'a, C: Clock> PropagationEngine<'a, C> {
    pub fn new(
        index: &'a CallIndex<'a>,
        strictness: Strictness,
        sanitizer_policy: SanitizerPolicy,
        caps: EffectiveCaps,
        source_rules: &'a [SourceRule],
        clock: C,
    ) -> Self {
        Self {
            index,
            strictness,
            sanitizer_policy,
            caps,
            source_rules,
            clock,
        }
    }

    fn arg_aware(&self) -> bool {
        self.strictness == Strictness::ArgAware
    }

    /// Every (chunk, source signal) pair, sorted by (chunk uid, rule id)
    fn collect_roots(&self) -> Vec<RootSource<'a>> {
        let mut roots: Vec<RootSource<'a>> = self
            .index
            .summaries_sorted()
            .into_iter()
            .flat_map(|row| {
                row.signals
                    .sources
                    .iter()
                    .filter(|source| !source.rule_id.is_empty())
                    .map(move |source| RootSource {
                        chunk_uid: row.chunk_uid.as_str(),
                        source,
                    })
            })
            .collect();
        roots.sort_by(|a, b| {
            a.chunk_uid
                .cmp(b.chunk_uid)
                .then_with(|| a.source.rule_id.cmp(&b.source.rule_id))
        });
        roots
    }

    fn root_taint(&self, root: &RootSource<'a>) -> Vec<String> {
        if !self.arg_aware() {
            return Vec::new();
        }
        self.index
            .summary(root.chunk_uid)
            .map(|row| {
                row.tainted_identifiers()
                    .iter()
                    .map(|id| id.trim())
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn deadline_passed(&self, started_ms: u64) -> bool {
        self.caps
            .max_ms
            .is_some_and(|max_ms| self.clock.elapsed_ms().saturating_sub(started_ms) > max_ms)
    }

    /// Run with the deadline measured from now
    pub fn run(&self) -> EngineRun {
        self.run_from(self.clock.elapsed_ms())
    }

    /// Run with the deadline measured from `started_ms` on the engine clock
    pub fn run_from(&self, started_ms: u64) -> EngineRun {
        let roots = self.collect_roots();
        let mut run = EngineRun {
            source_roots: roots.len(),
            ..Default::default()
        };

        if self.caps.max_total_flows == Some(0) {
            run.cap(CapKind::MaxTotalFlows);
            return run;
        }

        let mut arena = TraversalArena::new();
        let mut visited: FxHashSet<VisitKey<'a>> = FxHashSet::default();
        let mut pair_counts: FxHashMap<PairKey<'a>, usize> = FxHashMap::default();

        for root in roots {
            let taint_list = self.root_taint(&root);
            let taint_key = taint_set_key(&taint_list);
            let key = (
                root.chunk_uid,
                root.source.rule_id.as_str(),
                root.chunk_uid,
                taint_key.clone(),
                0,
            );
            if !visited.insert(key) {
                continue;
            }
            arena.push(TraversalState {
                chunk_uid: root.chunk_uid,
                root,
                parent: None,
                step_call_sites: Vec::new(),
                depth: 0,
                sanitizer_barriers_hit: 0,
                taint_list,
                taint_key,
            });
        }
        debug!(roots = run.source_roots, seeded = arena.len(), "Propagation roots seeded");

        while let Some(id) = arena.pop_front() {
            if self.deadline_passed(started_ms) {
                run.timed_out = true;
                run.cap(CapKind::MaxMs);
                break;
            }
            run.states_processed += 1;

            let summary = self.index.summary(arena.get(id).chunk_uid);
            if let Some(summary) = summary {
                self.emit_flows(&arena, id, summary, &mut pair_counts, &mut run);
            }
            if run.flows_full(&self.caps) {
                run.cap(CapKind::MaxTotalFlows);
                break;
            }

            let next = self.expand(&arena, id, summary, &mut visited, &mut run);
            for state in next {
                arena.push(state);
            }
            if run.caps_hit.contains(&CapKind::MaxEdgeExpansions) {
                break;
            }
        }

        run.elapsed_ms = self.clock.elapsed_ms().saturating_sub(started_ms);
        debug!(
            states = run.states_processed,
            expansions = run.edge_expansions,
            flows = run.flows.len(),
            timed_out = run.timed_out,
            "Propagation traversal finished"
        );
        run
    }

    fn emit_flows(
        &self,
        arena: &TraversalArena<'a>,
        id: StateId,
        summary: &'a RiskSummaryRow,
        pair_counts: &mut FxHashMap<PairKey<'a>, usize>,
        run: &mut EngineRun,
    ) {
        let state = arena.get(id);
        if state.chunk_uid == state.root.chunk_uid {
            return;
        }
        let sinks = sorted_sinks(summary);
        if sinks.is_empty() {
            return;
        }

        let path_chunk_uids = arena.path_chunk_uids(id);
        let call_sites = arena.call_sites_by_step(id);
        let hop_count = path_chunk_uids.len().saturating_sub(1);
        let root = state.root;

        for sink in sinks {
            let key = (
                root.chunk_uid,
                root.source.rule_id.as_str(),
                state.chunk_uid,
                sink.rule_id.as_str(),
            );
            let used = pair_counts.get(&key).copied().unwrap_or(0);
            if used >= self.caps.max_paths_per_pair {
                run.cap(CapKind::MaxPathsPerPair);
                continue;
            }
            if run.flows_full(&self.caps) {
                run.cap(CapKind::MaxTotalFlows);
                break;
            }
            pair_counts.insert(key, used + 1);

            let mut flow = FlowRecord {
                schema_version: FLOW_SCHEMA_VERSION,
                flow_id: build_flow_id(
                    root.chunk_uid,
                    &root.source.rule_id,
                    state.chunk_uid,
                    &sink.rule_id,
                    &path_chunk_uids,
                ),
                source: endpoint(root.chunk_uid, root.source, RuleType::Source),
                sink: endpoint(state.chunk_uid, sink, RuleType::Sink),
                path: FlowPath {
                    chunk_uids: path_chunk_uids.clone(),
                    call_site_ids_by_step: call_sites.clone(),
                },
                confidence: flow_confidence(
                    root.source.confidence,
                    sink.confidence,
                    hop_count,
                    state.sanitizer_barriers_hit,
                    self.sanitizer_policy,
                ),
                notes: FlowNotes {
                    strictness: self.strictness,
                    sanitizer_policy: self.sanitizer_policy,
                    hop_count,
                    sanitizer_barriers_hit: state.sanitizer_barriers_hit,
                    caps_hit: run.caps_hit.clone(),
                },
            };

            if !trim_flow_row(&mut flow, MAX_ROW_BYTES) {
                run.dropped_oversized += 1;
                warn!(flow_id = %flow.flow_id, "[risk] flow dropped due to size");
                continue;
            }
            run.call_site_ids
                .extend(flow.call_site_ids().map(str::to_string));
            run.flows.push(flow);
        }
    }

    /// Successor states of `id`, in push order
    fn expand(
        &self,
        arena: &TraversalArena<'a>,
        id: StateId,
        summary: Option<&'a RiskSummaryRow>,
        visited: &mut FxHashSet<VisitKey<'a>>,
        run: &mut EngineRun,
    ) -> Vec<TraversalState<'a>> {
        let state = arena.get(id);
        let mut next = Vec::new();

        if state.depth >= self.caps.max_depth {
            run.cap(CapKind::MaxDepth);
            return next;
        }

        let has_sanitizers = summary.is_some_and(|row| !row.signals.sanitizers.is_empty());
        if has_sanitizers && self.sanitizer_policy == SanitizerPolicy::Terminate {
            return next;
        }

        let Some(callees) = self.index.callees(state.chunk_uid) else {
            return next;
        };

        for (&callee, details) in callees {
            if self
                .caps
                .max_edge_expansions
                .is_some_and(|max| run.edge_expansions >= max)
            {
                run.cap(CapKind::MaxEdgeExpansions);
                break;
            }
            run.edge_expansions += 1;
            if details.is_empty() {
                continue;
            }

            let mut next_taint: Vec<String> = Vec::new();
            if self.arg_aware() {
                let tainted: BTreeSet<usize> = details
                    .iter()
                    .flat_map(|detail| detail.args.iter().enumerate())
                    .filter(|(_, arg)| is_arg_tainted(arg, &state.taint_list, self.source_rules))
                    .map(|(index, _)| index)
                    .collect();
                if tainted.is_empty() {
                    continue;
                }
                let params = self.index.param_names(state.chunk_uid, callee);
                next_taint.extend(
                    tainted
                        .iter()
                        .filter_map(|&index| params.get(index))
                        .map(|name| name.to_string()),
                );
                if let Some(callee_summary) = self.index.summary(callee) {
                    next_taint.extend(
                        callee_summary
                            .tainted_identifiers()
                            .iter()
                            .filter(|name| !name.is_empty())
                            .cloned(),
                    );
                }
            }

            let taint_key = taint_set_key(&next_taint);
            let depth = state.depth + 1;
            let key = (
                state.root.chunk_uid,
                state.root.source.rule_id.as_str(),
                callee,
                taint_key.clone(),
                depth,
            );
            if !visited.insert(key) {
                continue;
            }

            let caller_file = self
                .index
                .chunk(state.chunk_uid)
                .and_then(|chunk| chunk.file.as_deref());
            let step_call_sites =
                sample_call_sites(details, caller_file, self.caps.max_call_sites_per_edge)
                    .into_iter()
                    .filter_map(|site| site.call_site_id)
                    .collect();

            let crossed =
                usize::from(has_sanitizers && self.sanitizer_policy == SanitizerPolicy::Weaken);
            next.push(TraversalState {
                chunk_uid: callee,
                root: state.root,
                parent: Some(id),
                step_call_sites,
                depth,
                sanitizer_barriers_hit: state.sanitizer_barriers_hit + crossed,
                taint_list: next_taint,
                taint_key,
            });
        }
        next
    }
}
