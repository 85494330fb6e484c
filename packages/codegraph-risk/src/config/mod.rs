//! Configuration System
//!
//! - Level 1: Preset (`Preset::Fast/Balanced/Thorough/Custom`)
//! - Level 2: Builder / `key=value` overrides on `RiskInterproceduralConfig`
//! - Level 3: YAML/JSON file (`RiskConfigFile`, schema v1)
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_risk::config::{Preset, RiskInterproceduralConfig, RiskRuntime};
//!
//! let config = RiskInterproceduralConfig::from_preset(Preset::Fast).max_depth(3);
//! config.validate()?;
//! let runtime = RiskRuntime::new(config);
//! ```

pub mod error;
pub mod io;
pub mod preset;
pub mod risk_config;
pub mod rules;
pub mod runtime;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::{LoadedRiskConfig, RiskConfigFile, RiskConfigOverrides};
pub use preset::Preset;
pub use risk_config::{
    EmitArtifacts, RiskCaps, RiskInterproceduralConfig, SanitizerPolicy, Strictness,
};
pub use rules::{DetailedPatternConfig, RulePatternConfig, SourceRuleConfig};
pub use runtime::{IndexMode, InterproceduralState, RiskRuntime};
pub use validation::{Validatable, ValidatableCollection};
