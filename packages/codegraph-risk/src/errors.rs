//! Error types for codegraph-risk
//!
//! Analysis itself never fails: malformed signals are dropped, oversized rows
//! are degraded or counted, caps and timeouts are reported through stats.
//! Errors only surface from configuration and row serialization.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for codegraph-risk operations
#[derive(Debug, Error)]
pub enum CodegraphRiskError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Row serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for codegraph-risk operations
pub type Result<T> = std::result::Result<T, CodegraphRiskError>;
