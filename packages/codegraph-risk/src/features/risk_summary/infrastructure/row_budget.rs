//! Row caps and the serialized-size ceiling
//!
//! Oversized rows degrade in a fixed order: tags are stripped, then every
//! evidence list shrinks to one entry, then to none. A row that still does
//! not fit is dropped by the caller.

use crate::features::risk_summary::domain::{EvidenceLocation, RiskSummaryRow};

/// Truncate `list` to `cap`; true if anything was removed
pub fn clamp_list<T>(list: &mut Vec<T>, cap: usize) -> bool {
    if list.len() <= cap {
        return false;
    }
    list.truncate(cap);
    true
}

/// Clamp every evidence list to `cap`; true if any list shrank
pub fn clamp_evidence<'a, I>(lists: I, cap: usize) -> bool
where
    I: IntoIterator<Item = &'a mut Vec<EvidenceLocation>>,
{
    lists
        .into_iter()
        .fold(false, |changed, list| clamp_list(list, cap) | changed)
}

/// Result of fitting a row under the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowBudget {
    /// Row fits as built
    Fits,
    /// Row fits after degradation
    Degraded,
    /// Row cannot fit; caller drops it
    TooLarge,
}

impl RowBudget {
    pub fn is_kept(self) -> bool {
        !matches!(self, Self::TooLarge)
    }
}

/// Degrade `row` in place until it serializes to at most `max_bytes`
pub fn enforce_row_size(row: &mut RiskSummaryRow, max_bytes: usize) -> RowBudget {
    if row.serialized_len() <= max_bytes {
        return RowBudget::Fits;
    }

    for signal in row.signals.signals_mut() {
        signal.tags.clear();
    }
    if row.serialized_len() <= max_bytes {
        return RowBudget::Degraded;
    }

    for cap in [1, 0] {
        if clamp_evidence(row.signals.evidence_lists_mut(), cap) {
            row.truncated.evidence = true;
        }
        if row.serialized_len() <= max_bytes {
            return RowBudget::Degraded;
        }
    }

    RowBudget::TooLarge
}
