//! Matching implementations

pub mod identifier;
pub mod rule_patterns;

pub use identifier::{contains_identifier, contains_identifier_in};
pub use rule_patterns::{
    match_rule_patterns, matches_rule, LineLowerCache, PatternMatch, RulePattern, SourceRule,
};
