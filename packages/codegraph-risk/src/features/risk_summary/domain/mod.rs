//! Summary domain models

pub mod evidence;
pub mod signal;
pub mod summary_row;

pub use evidence::{EvidenceKey, EvidenceLocation};
pub use signal::{LocalFlow, RiskSignal, RuleType};
pub use summary_row::{
    RiskSignals, RiskSummaryRow, SignalTotals, SummaryCaps, SymbolRef, TaintHintsRow,
    TruncationFlags, MAX_ROW_BYTES, ROW_SCHEMA_VERSION,
};
