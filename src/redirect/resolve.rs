//! Destination resolution.
//!
//! # Responsibilities
//! - Substitute regex capture groups into the destination template
//! - Join relative destinations onto the site root
//!
//! # Design Decisions
//! - One left-to-right pass: `\n` and `$n` are the same backreference, and
//!   substituted text is never scanned again
//! - The longest digit run naming an existing group wins (`$12` is group 12
//!   when it exists, otherwise group 1 followed by `2`)
//! - `$0` and references to missing groups are kept literally
//! - Whether a destination leaves the site is decided from the template, never
//!   from substituted request text

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::redirect::matcher::MatchResult;
use crate::redirect::normalize::is_absolute;
use crate::redirect::rule::RuleType;

/// Error type for an unusable site root.
#[derive(Debug, Error)]
pub enum SiteRootError {
    #[error("invalid site URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("site URL must use http or https, got `{0}`")]
    UnsupportedScheme(String),

    #[error("site URL has no host")]
    MissingHost,
}

/// Absolute base URL that relative destinations are joined onto.
///
/// Always ends in `/` and never carries a query or fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot(Url);

impl SiteRoot {
    pub fn parse(base_url: &str) -> Result<Self, SiteRootError> {
        let mut url = Url::parse(base_url)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SiteRootError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none() {
            return Err(SiteRootError::MissingHost);
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Build the absolute URL for a destination relative to the site root.
    pub fn join(&self, destination: &str) -> String {
        format!("{}{}", self.0.as_str(), destination.trim_start_matches('/'))
    }

    /// Path of the site root without surrounding slashes (`blog` for
    /// `https://example.com/blog/`).
    pub fn base_path(&self) -> &str {
        self.0.path().trim_matches('/')
    }

    /// Remove the site root's path from the start of a request path or URI.
    ///
    /// Input outside the root's path is returned unchanged.
    pub fn strip_base_path<'a>(&self, path: &'a str) -> &'a str {
        let base = self.base_path();
        if base.is_empty() {
            return path;
        }

        match path.trim_start_matches('/').strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '?', '#']) => {
                rest.trim_start_matches('/')
            }
            _ => path,
        }
    }

    /// Request URI on this site for a URI relative to the root.
    pub fn request_uri(&self, relative: &str) -> String {
        format!("{}{}", self.0.path(), relative.trim_start_matches('/'))
    }
}

impl FromStr for SiteRoot {
    type Err = SiteRootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SiteRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    /// Template result before the site root is applied.
    pub relative: String,
    /// Absolute URL sent in the `Location` header.
    pub absolute: String,
}

/// Compute the destination for a matched rule.
pub fn resolve(result: &MatchResult, site_root: &SiteRoot) -> Destination {
    let template = match result.rule.rule_type {
        RuleType::Regex => result.rule.to.replace("\\/", "/"),
        RuleType::Exact | RuleType::Wildcard => result.rule.to.clone(),
    };

    let relative = substitute(&template, &result.captures);
    let absolute = if is_absolute(&template) {
        relative.clone()
    } else {
        site_root.join(&relative)
    };

    Destination { relative, absolute }
}

/// Replace `\n` and `$n` backreferences with 1-indexed capture groups.
pub fn substitute(template: &str, captures: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['\\', '$']) {
        out.push_str(&rest[..pos]);

        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();

        match group_reference(&after[..digits], captures.len()) {
            Some((index, used)) => {
                out.push_str(&captures[index - 1]);
                rest = &after[used..];
            }
            None => {
                out.push_str(&rest[pos..=pos]);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Longest prefix of `digits` naming a group in `1..=groups`, with the
/// number of digits it consumed.
fn group_reference(digits: &str, groups: usize) -> Option<(usize, usize)> {
    (1..=digits.len()).rev().find_map(|len| {
        let index: usize = digits[..len].parse().ok()?;
        (1..=groups).contains(&index).then_some((index, len))
    })
}
