//! Propagation use case

pub mod propagate;

pub use propagate::{
    attach_artifact_refs, propagate, propagate_with_clock, PropagateInput, PropagationOutput,
};
