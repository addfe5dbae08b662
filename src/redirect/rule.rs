//! Redirect rule definitions and sanitization.
//!
//! # Data Flow
//! ```text
//! RawDefinition[] (untyped, from config or a provider)
//!     → shape check (object with `from` and `to`)
//!     → type defaulting (exact)
//!     → normalize `from` / `to`
//!     → RedirectRule[] (same relative order)
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::redirect::normalize::normalize;

/// A rule definition as supplied by the configuration source.
///
/// Kept untyped so malformed entries can be dropped instead of failing the
/// whole rule set.
pub type RawDefinition = Value;

/// How a rule's `from` pattern is compared with the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Literal, case-sensitive comparison.
    #[default]
    Exact,
    /// Shell glob (`*`, `?`, `[...]`).
    Wildcard,
    /// Regular expression body, searched unanchored.
    Regex,
}

impl RuleType {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "exact" => Some(Self::Exact),
            "wildcard" => Some(Self::Wildcard),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleType::Exact => write!(f, "exact"),
            RuleType::Wildcard => write!(f, "wildcard"),
            RuleType::Regex => write!(f, "regex"),
        }
    }
}

/// A validated, normalized redirect rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
}

impl RedirectRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>, rule_type: RuleType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            rule_type,
        }
    }
}

/// Turn raw definitions into normalized rules, dropping invalid ones.
pub fn sanitize(raw: &[RawDefinition]) -> Vec<RedirectRule> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, definition)| {
            let rule = sanitize_definition(definition);
            if rule.is_none() {
                tracing::debug!(index, "Dropping invalid redirect definition");
            }
            rule
        })
        .collect()
}

fn sanitize_definition(definition: &RawDefinition) -> Option<RedirectRule> {
    let object = definition.as_object()?;

    let from = scalar_string(object.get("from")?)?;
    let to = scalar_string(object.get("to")?)?;

    let rule_type = match object.get("type") {
        None | Some(Value::Null) => RuleType::default(),
        Some(Value::String(value)) => RuleType::parse(value)?,
        Some(_) => return None,
    };

    let is_regex = rule_type == RuleType::Regex;

    Some(RedirectRule {
        from: normalize(&from, is_regex),
        to: normalize(&to, is_regex),
        rule_type,
    })
}

/// Strings pass through, numbers are stringified, null and compound values
/// do not count as present.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
