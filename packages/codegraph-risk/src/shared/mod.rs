//! Shared module - Common types and utilities
//!
//! Types shared across all features: the chunk input model produced by the
//! extraction pipeline, and small hashing/path helpers.

pub mod models;
pub mod utils;

// Re-exports for convenience
pub use models::*;
pub use utils::hash::sha1_tagged;
