//! Shared matching primitives
//!
//! Pure functions used both by the rule-matching pass that produces raw
//! signals and by `argAware` propagation when it inspects call arguments.

pub mod domain;
pub mod infrastructure;

pub use domain::{severity_rank, Severity};
pub use infrastructure::{
    contains_identifier, contains_identifier_in, match_rule_patterns, matches_rule,
    LineLowerCache, PatternMatch, RulePattern, SourceRule,
};
