//! Input model consumed from the extraction pipeline
//!
//! A `RiskChunk` is a function-level unit carrying the raw risk signals found
//! by rule matching plus the call relations resolved by relation linking.
//! Deserialization is lenient: malformed list entries are skipped instead of
//! failing the whole chunk.

pub mod chunk;
pub mod lenient;
pub mod risk;

pub use chunk::{CallDetail, CallSummary, ChunkDocMeta, CodeRelations, RiskChunk};
pub use risk::{
    CompactCount, CompactInterprocedural, CompactRiskSummary, CompactSinks, RawEvidence,
    RawLocalFlow, RawRiskSignal, RiskPayload, TaintHints,
};
