//! Propagation domain models

pub mod caps;
pub mod flow;
pub mod state;
pub mod stats;

pub use caps::{CapKind, CapsHit, EffectiveCaps};
pub use flow::{FlowEndpoint, FlowNotes, FlowPath, FlowRecord, FLOW_SCHEMA_VERSION};
pub use state::{RootSource, StateId, TraversalArena, TraversalState};
pub use stats::{
    ArtifactRef, ArtifactRefs, CallSiteSampling, DropReason, DroppedRecords, EffectiveConfig,
    EngineCounts, EngineStats, EngineStatus, TimingMs, CALL_SITE_ORDER,
};
