//! Matching domain types

pub mod severity;

pub use severity::{severity_rank, Severity};
