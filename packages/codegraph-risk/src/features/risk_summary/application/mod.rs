//! Summarization use case

pub mod summarize;

pub use summarize::{apply_rollups, summarize, summarize_in_place, SummarizeOutput, SummaryStats};
