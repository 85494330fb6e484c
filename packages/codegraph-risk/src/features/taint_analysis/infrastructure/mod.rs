//! Propagation implementations

pub mod call_index;
pub mod call_sites;
pub mod clock;
pub mod engine;
pub mod flow_builder;

pub use call_index::CallIndex;
pub use call_sites::{derive_call_site_id, normalize_callee, sample_call_sites};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineRun, PropagationEngine};
pub use flow_builder::{build_flow_id, flow_confidence, taint_set_key, trim_flow_row};
