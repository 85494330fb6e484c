//! Feature slices, leaves first:
//!
//! - `risk_matching`: identifier-boundary search, prefiltered rule patterns, severity order
//! - `risk_summary`: raw chunk signals → deterministic, size-bounded summary rows
//! - `taint_analysis`: summaries + call graph → capped source→sink flows

pub mod risk_matching;
pub mod risk_summary;
pub mod taint_analysis;
