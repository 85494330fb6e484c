//! Prefiltered rule-pattern matching
//!
//! Each pattern may carry a literal prefilter and/or a lower-cased prefilter
//! that must be present before the regex runs. Patterns come from external
//! configuration; one that fails to compile is logged and never matches, so
//! a bad rule cannot take the engine down.

use regex::{Regex, RegexBuilder};

use crate::config::{RulePatternConfig, SourceRuleConfig};

/// Upper bound on compiled program size for configured patterns
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Compiled pattern with its prefilters
#[derive(Debug, Clone)]
pub struct RulePattern {
    pub source: String,
    regex: Option<Regex>,
    prefilter: Option<String>,
    prefilter_lower: Option<String>,
}

impl RulePattern {
    /// Compile a configured pattern; compile errors yield a never-matching pattern
    pub fn compile(config: &RulePatternConfig) -> Self {
        let (source, flags, prefilter, prefilter_lower) = match config {
            RulePatternConfig::Regex(pattern) => (pattern.clone(), None, None, None),
            RulePatternConfig::Detailed(d) => (
                d.pattern.clone(),
                d.flags.clone(),
                d.prefilter.clone().filter(|p| !p.is_empty()),
                d.prefilter_lower
                    .as_ref()
                    .map(|p| p.to_lowercase())
                    .filter(|p| !p.is_empty()),
            ),
        };
        let case_insensitive = flags.as_deref().is_some_and(|f| f.contains('i'));
        let regex = match RegexBuilder::new(&source)
            .case_insensitive(case_insensitive)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!("[risk] skipping invalid rule pattern {:?}: {}", source, err);
                None
            }
        };
        Self {
            source,
            regex,
            prefilter,
            prefilter_lower,
        }
    }

    /// False if the pattern failed to compile
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    fn find(&self, text: &str, lower: &mut LineLowerCache) -> Option<PatternMatch> {
        let regex = self.regex.as_ref()?;
        if let Some(prefilter) = &self.prefilter {
            if !text.contains(prefilter.as_str()) {
                return None;
            }
        }
        if let Some(prefilter_lower) = &self.prefilter_lower {
            if !lower.get(text).contains(prefilter_lower.as_str()) {
                return None;
            }
        }
        regex.find(text).map(|m| PatternMatch {
            index: m.start(),
            matched: m.as_str().to_string(),
        })
    }
}

/// A source rule with compiled patterns
#[derive(Debug, Clone)]
pub struct SourceRule {
    pub id: String,
    pub patterns: Vec<RulePattern>,
}

impl SourceRule {
    pub fn compile(config: &SourceRuleConfig) -> Self {
        Self {
            id: config.id.clone(),
            patterns: config.patterns.iter().map(RulePattern::compile).collect(),
        }
    }
}

/// First match of a rule: byte offset and matched text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub index: usize,
    pub matched: String,
}

/// Memoized lower-cased copy of the line being matched
///
/// Reuse one cache while testing many rules against the same line.
#[derive(Debug, Default)]
pub struct LineLowerCache {
    source: String,
    lower: Option<String>,
}

impl LineLowerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower-cased `text`, computed at most once per distinct line
    pub fn get(&mut self, text: &str) -> &str {
        if self.lower.is_none() || self.source != text {
            self.source.clear();
            self.source.push_str(text);
            self.lower = Some(text.to_lowercase());
        }
        self.lower.as_deref().unwrap_or_default()
    }
}

/// Try each pattern of `rule` in order and return the first match
pub fn match_rule_patterns(
    text: &str,
    rule: &SourceRule,
    line_lower: Option<&mut LineLowerCache>,
) -> Option<PatternMatch> {
    let mut local = LineLowerCache::new();
    let cache = match line_lower {
        Some(cache) => cache,
        None => &mut local,
    };
    rule.patterns
        .iter()
        .find_map(|pattern| pattern.find(text, &mut *cache))
}

/// Boolean form of `match_rule_patterns`
pub fn matches_rule(text: &str, rule: &SourceRule) -> bool {
    match_rule_patterns(text, rule, None).is_some()
}
