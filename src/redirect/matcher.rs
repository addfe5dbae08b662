//! Rule matching logic.
//!
//! # Responsibilities
//! - Compile each rule's `from` into a path matcher for its type
//! - Evaluate rules in order, first match wins
//! - Record regex capture groups for the winning rule
//!
//! # Design Decisions
//! - Exact matching is byte-for-byte and case-sensitive
//! - Wildcards follow shell globbing without path-segment rules (`*` spans `/`),
//!   so `**` is just a longer way of writing `*`
//! - Regex bodies are searched unanchored; authors add `^`/`$` themselves
//! - A pattern that fails to compile is a non-match for that rule only
//! - Regexes use the `regex` crate, which guarantees linear-time matching on
//!   request-controlled input. Lookaround and backreferences inside a pattern
//!   are not supported and make the rule a non-match

use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use thiserror::Error;

use crate::redirect::rule::{RedirectRule, RuleType};

/// Upper bound on the compiled size of a single rule's regex.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Error raised when a rule's pattern cannot be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid wildcard pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// The rule that matched a request, with its capture groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub rule: RedirectRule,
    /// Capture groups 1..n in order. Empty for exact and wildcard rules.
    pub captures: Vec<String>,
}

/// Trait for matching a request path against one compiled rule pattern.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns the capture groups when the path matches, `None` otherwise.
    fn captures(&self, path: &str) -> Option<Vec<String>>;
}

/// Matches the path literally.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    expected: String,
}

impl ExactMatcher {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl PathMatcher for ExactMatcher {
    fn captures(&self, path: &str) -> Option<Vec<String>> {
        (path == self.expected).then(Vec::new)
    }
}

/// Matches the path with a shell glob.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    pattern: Pattern,
}

impl WildcardMatcher {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: Pattern::new(&collapse_stars(pattern))?,
        })
    }
}

/// Reduce every run of `*` to a single `*`.
///
/// `glob` only accepts `**` as a whole path component, while a `*` that
/// already crosses `/` makes the doubled form redundant.
fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

impl PathMatcher for WildcardMatcher {
    fn captures(&self, path: &str) -> Option<Vec<String>> {
        self.pattern
            .matches_with(path, GLOB_OPTIONS)
            .then(Vec::new)
    }
}

/// Searches the path with a regular expression.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Compile a slash-escaped regex body.
    pub fn new(body: &str) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(&body.replace("\\/", "/"))
            .size_limit(REGEX_SIZE_LIMIT)
            .build()?;
        Ok(Self { regex })
    }
}

impl PathMatcher for RegexMatcher {
    fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }
}

/// Compile the matcher for a rule according to its type.
pub fn compile(rule: &RedirectRule) -> Result<Box<dyn PathMatcher>, PatternError> {
    let matcher: Box<dyn PathMatcher> = match rule.rule_type {
        RuleType::Exact => Box::new(ExactMatcher::new(rule.from.as_str())),
        RuleType::Wildcard => Box::new(WildcardMatcher::new(&rule.from)?),
        RuleType::Regex => Box::new(RegexMatcher::new(&rule.from)?),
    };
    Ok(matcher)
}

/// Find the first rule, in order, that matches `request_path`.
pub fn match_rules(rules: &[RedirectRule], request_path: &str) -> Option<MatchResult> {
    rules.iter().find_map(|rule| {
        let matcher = match compile(rule) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(from = %rule.from, rule_type = %rule.rule_type, error = %e, "Skipping rule with invalid pattern");
                return None;
            }
        };

        matcher.captures(request_path).map(|captures| MatchResult {
            rule: rule.clone(),
            captures,
        })
    })
}
