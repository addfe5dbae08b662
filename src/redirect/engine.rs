//! Per-request redirect evaluation.
//!
//! The engine owns no per-request state. Every evaluation pulls a fresh set
//! of raw definitions from its provider, sanitizes them, and threads the
//! intermediate values through the pipeline stages.
//!
//! Rules are written relative to the site root. When the root carries a path
//! (`https://example.com/blog/`), that prefix is removed from the request
//! before matching, and the loop guard compares against the request as seen
//! under the root, so a front end that already stripped the prefix behaves the
//! same as one that did not.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::observability::metrics;
use crate::redirect::dispatch::{dispatch, Outcome};
use crate::redirect::matcher::{match_rules, MatchResult};
use crate::redirect::resolve::{resolve, Destination, SiteRoot};
use crate::redirect::rule::{sanitize, RawDefinition, RedirectRule};

/// Source of raw rule definitions, consulted once per evaluation.
pub trait RuleProvider: Send + Sync {
    fn definitions(&self) -> Vec<RawDefinition>;
}

/// A fixed list of definitions.
#[derive(Debug, Clone, Default)]
pub struct StaticRules(Vec<RawDefinition>);

impl StaticRules {
    pub fn new(definitions: Vec<RawDefinition>) -> Self {
        Self(definitions)
    }
}

impl RuleProvider for StaticRules {
    fn definitions(&self) -> Vec<RawDefinition> {
        self.0.clone()
    }
}

impl<F> RuleProvider for F
where
    F: Fn() -> Vec<RawDefinition> + Send + Sync,
{
    fn definitions(&self) -> Vec<RawDefinition> {
        self()
    }
}

/// The request as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Request path without query and surrounding slashes.
    pub path: String,
    /// Full request URI (path and query) used for loop detection.
    pub uri: String,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            uri: uri.into(),
        }
    }

    /// Derive the path from a request URI such as `/old-page/?a=1`.
    pub fn from_request_uri(uri: &str) -> Self {
        let path = uri
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_matches('/');
        Self::new(path, uri)
    }
}

/// Every intermediate result of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub request_path: String,
    pub rules: Vec<RedirectRule>,
    pub matched: Option<MatchResult>,
    pub destination: Option<Destination>,
    pub outcome: Outcome,
}

/// Redirect rule engine.
#[derive(Clone)]
pub struct RedirectEngine {
    provider: Arc<dyn RuleProvider>,
    site_root: SiteRoot,
    debug: bool,
}

impl RedirectEngine {
    pub fn new(provider: impl RuleProvider + 'static, site_root: SiteRoot) -> Self {
        Self {
            provider: Arc::new(provider),
            site_root,
            debug: false,
        }
    }

    /// Report destinations instead of redirecting.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn site_root(&self) -> &SiteRoot {
        &self.site_root
    }

    /// Decide what to do with a request.
    pub fn evaluate(&self, request: &RequestContext) -> Outcome {
        let start = Instant::now();
        let evaluation = self.trace(request);
        metrics::record_evaluation(evaluation.outcome.as_str(), start);

        match &evaluation.outcome {
            Outcome::Redirect(destination) => {
                tracing::info!(path = %request.path, destination = %destination, "Redirecting request");
            }
            outcome => {
                tracing::debug!(path = %request.path, outcome = outcome.as_str(), "Redirect evaluation finished");
            }
        }

        evaluation.outcome
    }

    /// Run the pipeline and keep every intermediate result.
    pub fn trace(&self, request: &RequestContext) -> Evaluation {
        let request = self.under_site_root(request);
        let rules = sanitize(&self.provider.definitions());
        let matched = match_rules(&rules, &request.path);

        let (destination, outcome) = match &matched {
            Some(result) => {
                let destination = resolve(result, &self.site_root);
                let outcome = dispatch(&request.uri, &destination.absolute, self.debug);
                (Some(destination), outcome)
            }
            None => (None, Outcome::NoRedirect),
        };

        Evaluation {
            request_path: request.path,
            rules,
            matched,
            destination,
            outcome,
        }
    }
}

impl RedirectEngine {
    /// Path relative to the site root, URI as served under it.
    fn under_site_root(&self, request: &RequestContext) -> RequestContext {
        let path = self.site_root.strip_base_path(&request.path);
        let uri = self
            .site_root
            .request_uri(self.site_root.strip_base_path(&request.uri));
        RequestContext::new(path, uri)
    }
}

impl std::fmt::Debug for RedirectEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectEngine")
            .field("site_root", &self.site_root)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SITE: &str = "https://example.com";

    fn engine(definitions: Vec<RawDefinition>) -> RedirectEngine {
        RedirectEngine::new(StaticRules::new(definitions), SiteRoot::parse(SITE).unwrap())
    }

    fn request(uri: &str) -> RequestContext {
        RequestContext::from_request_uri(uri)
    }

    #[test]
    fn test_request_context_from_uri() {
        let ctx = request("/old-page/?a=1");
        assert_eq!(ctx.path, "old-page");
        assert_eq!(ctx.uri, "/old-page/?a=1");
        assert_eq!(request("/").path, "");
    }

    #[test]
    fn test_exact_redirect() {
        let engine = engine(vec![json!({ "from": "old-page", "to": "new-page", "type": "exact" })]);
        assert_eq!(
            engine.evaluate(&request("/old-page")),
            Outcome::Redirect("https://example.com/new-page".into())
        );
    }

    #[test]
    fn test_empty_rules_never_redirect() {
        let engine = engine(Vec::new());
        assert_eq!(engine.evaluate(&request("/anything")), Outcome::NoRedirect);
    }

    #[test]
    fn test_wildcard_redirect() {
        let engine = engine(vec![json!({ "from": "events/*", "to": "calendar", "type": "wildcard" })]);
        assert_eq!(
            engine.evaluate(&request("/events/2024")),
            Outcome::Redirect("https://example.com/calendar".into())
        );
    }

    #[test]
    fn test_regex_redirect_with_capture() {
        let engine = engine(vec![json!({ "from": "^blog/(\\d+)$", "to": "archive/$1", "type": "regex" })]);
        assert_eq!(
            engine.evaluate(&request("/blog/42/")),
            Outcome::Redirect("https://example.com/archive/42".into())
        );
    }

    #[test]
    fn test_first_listed_rule_wins() {
        let engine = engine(vec![
            json!({ "from": "sale", "to": "first" }),
            json!({ "from": "sal?", "to": "second", "type": "wildcard" }),
        ]);
        assert_eq!(
            engine.evaluate(&request("/sale")),
            Outcome::Redirect("https://example.com/first".into())
        );
    }

    #[test]
    fn test_self_redirect_is_suppressed() {
        let engine = engine(vec![json!({ "from": "page*", "to": "page/?b=2&a=1", "type": "wildcard" })]);
        assert_eq!(engine.evaluate(&request("/page?a=1&b=2")), Outcome::NoRedirect);
        assert_eq!(
            engine.evaluate(&request("/page/x")),
            Outcome::Redirect("https://example.com/page/?b=2&a=1".into())
        );
    }

    #[test]
    fn test_wildcard_covering_its_own_target_does_not_loop() {
        let engine = engine(vec![json!({ "from": "*", "to": "home", "type": "wildcard" })]);
        assert_eq!(engine.evaluate(&request("/home")), Outcome::NoRedirect);
    }

    #[test]
    fn test_request_text_cannot_leave_the_site() {
        let engine = engine(vec![json!({ "from": "^go/(.*)$", "to": "$1", "type": "regex" })]);
        assert_eq!(
            engine.evaluate(&request("/go/https://evil.example/x")),
            Outcome::Redirect("https://example.com/https://evil.example/x".into())
        );
    }

    #[test]
    fn test_site_root_path_is_removed_before_matching() {
        let engine = RedirectEngine::new(
            StaticRules::new(vec![json!({ "from": "old", "to": "new" })]),
            SiteRoot::parse("https://example.com/blog").unwrap(),
        );

        for uri in ["/blog/old", "/old", "/blog/old/?a=1"] {
            assert_eq!(
                engine.evaluate(&request(uri)),
                Outcome::Redirect("https://example.com/blog/new".into()),
                "{uri}"
            );
        }
        assert_eq!(engine.trace(&request("/blog/old")).request_path, "old");
        assert_eq!(engine.evaluate(&request("/blogroll")), Outcome::NoRedirect);
    }

    #[test]
    fn test_site_root_path_self_redirect_is_suppressed() {
        let engine = RedirectEngine::new(
            StaticRules::new(vec![json!({ "from": "*", "to": "home", "type": "wildcard" })]),
            SiteRoot::parse("https://example.com/blog/").unwrap(),
        );

        assert_eq!(engine.evaluate(&request("/home")), Outcome::NoRedirect);
        assert_eq!(engine.evaluate(&request("/blog/home/")), Outcome::NoRedirect);
        assert_eq!(
            engine.evaluate(&request("/blog/about")),
            Outcome::Redirect("https://example.com/blog/home".into())
        );
    }

    #[test]
    fn test_debug_mode_reports() {
        let engine = engine(vec![json!({ "from": "old", "to": "new" })]).debug(true);
        assert_eq!(
            engine.evaluate(&request("/old")),
            Outcome::DebugReport("https://example.com/new".into())
        );
    }

    #[test]
    fn test_provider_is_consulted_per_evaluation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let provider = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![json!({ "from": "a", "to": "b" })]
        };

        let engine = RedirectEngine::new(provider, SiteRoot::parse(SITE).unwrap());
        engine.evaluate(&request("/a"));
        engine.evaluate(&request("/c"));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_trace_exposes_stages() {
        let engine = engine(vec![
            json!({ "to": "missing-from" }),
            json!({ "from": "^news\\/(\\d{4})\\/(\\d{2})$", "to": "press/$2/$1", "type": "regex" }),
        ]);

        let evaluation = engine.trace(&request("/news/2024/05"));
        assert_eq!(evaluation.rules.len(), 1);
        assert_eq!(evaluation.matched.unwrap().captures, vec!["2024", "05"]);
        assert_eq!(evaluation.destination.unwrap().relative, "press/05/2024");
        assert_eq!(
            evaluation.outcome,
            Outcome::Redirect("https://example.com/press/05/2024".into())
        );
    }
}
