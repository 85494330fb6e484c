//! Interprocedural taint propagation
//!
//! Capped breadth-first search from every source signal over the resolved
//! call graph, emitting one `FlowRecord` per reachable sink.
//!
//! # Architecture (Hexagonal)
//!
//! ```text
//! RiskPipeline
//!      ↓
//! application/ (propagate) ← Entry Point
//!      ↓
//! infrastructure/ (call_index, call_sites, flow_builder, engine, clock)
//!      ↓
//! domain/ (FlowRecord, TraversalArena, EngineStats, EffectiveCaps)
//! ```
//!
//! Termination on cyclic graphs comes from the visited set keyed by
//! `(root chunk, root rule, node, taint key, depth)`, with depth bounded by
//! `maxDepth`.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    attach_artifact_refs, propagate, propagate_with_clock, PropagateInput, PropagationOutput,
};
pub use domain::{
    ArtifactRef, CapKind, EffectiveCaps, EngineStats, EngineStatus, FlowEndpoint, FlowNotes,
    FlowPath, FlowRecord,
};
pub use infrastructure::{Clock, ManualClock, SystemClock};
