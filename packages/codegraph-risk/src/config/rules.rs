//! Source-rule configuration
//!
//! The global source-rule list is only consulted by `argAware` propagation,
//! to decide whether a call argument is itself a taint source
//! (e.g. `req.query.id` passed straight into a callee).

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;

/// One source rule: an id plus the patterns that recognize it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRuleConfig {
    pub id: String,
    #[serde(default)]
    pub patterns: Vec<RulePatternConfig>,
}

impl SourceRuleConfig {
    /// Rule with plain regex patterns and no prefilters
    pub fn new<I, S>(id: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            patterns: patterns
                .into_iter()
                .map(|p| RulePatternConfig::Regex(p.into()))
                .collect(),
        }
    }
}

impl Validatable for SourceRuleConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source rule id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "SourceRuleConfig"
    }
}

/// A pattern is either a bare regex or a regex with prefilters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RulePatternConfig {
    Regex(String),
    Detailed(DetailedPatternConfig),
}

/// Regex plus the cheap substring checks run before it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedPatternConfig {
    pub pattern: String,
    /// Regex flags; only `i` (case-insensitive) is meaningful
    pub flags: Option<String>,
    /// Literal that must appear in the text
    pub prefilter: Option<String>,
    /// Literal that must appear in the lower-cased text
    pub prefilter_lower: Option<String>,
}
