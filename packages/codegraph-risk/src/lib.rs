/*
 * Codegraph Risk - Risk summaries and interprocedural taint flows
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Chunk input model, hashing and path helpers
 * - features/    : Vertical slices (risk_matching → risk_summary → taint_analysis)
 * - pipeline/    : Orchestration (summaries → flows → stats + JSONL rows)
 * - config/      : Interprocedural config, caps, presets, YAML/JSON loading
 *
 * Data flows strictly downward: chunks → summaries → flows.
 * Single-threaded and synchronous; invoked once per indexing pass.
 */

#![allow(clippy::too_many_arguments)] // Engine state constructors carry many fields
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::should_implement_trait)] // Preset::from_str returns ConfigError

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (matching → summarization → propagation)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{IndexMode, Preset, RiskCaps, RiskInterproceduralConfig, RiskRuntime};
pub use errors::{CodegraphRiskError, Result};
pub use features::risk_summary::{summarize, SummarizeOutput};
pub use features::taint_analysis::{propagate, PropagateInput, PropagationOutput};
pub use pipeline::{RiskPipeline, RiskPipelineOutput};
pub use shared::models::RiskChunk;
