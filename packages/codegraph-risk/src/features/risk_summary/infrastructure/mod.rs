//! Summarization implementations
//!
//! - `normalizer`: raw payload → sorted, deduplicated signals and evidence
//! - `row_budget`: list caps and the serialized-row ceiling
//! - `compact`: chunk-level rollup for search display

pub mod compact;
pub mod normalizer;
pub mod row_budget;

pub use compact::build_compact_summary;
pub use normalizer::{
    normalize_evidence, normalize_local_flows, normalize_signals, normalize_tags,
    normalize_taint_hints, EvidenceContext,
};
pub use row_budget::{clamp_evidence, clamp_list, enforce_row_size, RowBudget};
