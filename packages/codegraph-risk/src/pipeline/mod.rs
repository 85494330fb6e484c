//! Pipeline orchestration
//!
//! Chains summarization and propagation for one indexing pass and turns the
//! results into JSONL row streams.

pub mod jsonl;
pub mod orchestrator;
pub mod result;

pub use jsonl::{write_jsonl, JsonlSummary};
pub use orchestrator::RiskPipeline;
pub use result::RiskPipelineOutput;
