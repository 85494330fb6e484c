//! Risk summarization
//!
//! Turns the raw per-chunk risk payload into one deterministic
//! `RiskSummaryRow` per chunk with signals, enforcing per-row caps and a
//! 32 KiB serialized-row ceiling, and builds the compact rollup shown next to
//! the chunk in search results.
//!
//! # Architecture (Hexagonal)
//!
//! ```text
//! RiskPipeline
//!      ↓
//! application/ (summarize) ← Entry Point
//!      ↓
//! infrastructure/ (normalizer, row_budget, compact)
//!      ↓
//! domain/ (RiskSignal, LocalFlow, RiskSummaryRow)
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export application layer (primary interface)
pub use application::{apply_rollups, summarize, summarize_in_place, SummarizeOutput, SummaryStats};

// Re-export domain types
pub use domain::{
    EvidenceLocation, LocalFlow, RiskSignal, RiskSignals, RiskSummaryRow, RuleType, SignalTotals,
    SummaryCaps, SymbolRef, TaintHintsRow, TruncationFlags, MAX_ROW_BYTES, ROW_SCHEMA_VERSION,
};
