//! Engine behavior through the public API.

use redirect_engine::redirect::rule::sanitize;
use redirect_engine::redirect::{SiteRoot, StaticRules};
use redirect_engine::{Outcome, RedirectEngine, RequestContext};
use serde_json::{json, Value};

fn evaluate(definitions: Vec<Value>, uri: &str) -> Outcome {
    let engine = RedirectEngine::new(
        StaticRules::new(definitions),
        SiteRoot::parse("https://example.com/").unwrap(),
    );
    engine.evaluate(&RequestContext::from_request_uri(uri))
}

#[test]
fn test_absolute_from_matches_bare_path() {
    let outcome = evaluate(
        vec![json!({ "from": "https://example.com/old-page/", "to": "https://example.com/new-page/" })],
        "/old-page",
    );
    assert_eq!(outcome, Outcome::Redirect("https://example.com/new-page".into()));
}

#[test]
fn test_site_root_with_path() {
    let engine = RedirectEngine::new(
        StaticRules::new(vec![json!({ "from": "old", "to": "new" })]),
        SiteRoot::parse("https://example.com/blog").unwrap(),
    );

    for uri in ["/blog/old", "/old"] {
        assert_eq!(
            engine.evaluate(&RequestContext::from_request_uri(uri)),
            Outcome::Redirect("https://example.com/blog/new".into())
        );
    }
    assert_eq!(
        engine.evaluate(&RequestContext::from_request_uri("/blog/new")),
        Outcome::NoRedirect
    );
}

#[test]
fn test_url_in_request_path_is_not_followed() {
    let outcome = evaluate(
        vec![json!({ "from": "^go\\/(.*)$", "to": "\\1", "type": "regex" })],
        "/go/https://evil.example/x",
    );
    assert_eq!(
        outcome,
        Outcome::Redirect("https://example.com/https://evil.example/x".into())
    );
}

#[test]
fn test_destination_query_is_kept() {
    let outcome = evaluate(
        vec![json!({ "from": "^search\\/(\\w+)$", "to": "find?q=$1&page=1", "type": "regex" })],
        "/search/rust",
    );
    assert_eq!(outcome, Outcome::Redirect("https://example.com/find?q=rust&page=1".into()));
}

#[test]
fn test_wildcard_does_not_match_prefix_without_separator() {
    let definitions = vec![json!({ "from": "foo/*", "to": "bar", "type": "wildcard" })];
    assert_eq!(evaluate(definitions.clone(), "/foobar"), Outcome::NoRedirect);
    assert_ne!(evaluate(definitions, "/foo/bar/baz"), Outcome::NoRedirect);
}

#[test]
fn test_sanitized_rules_are_stable() {
    let raw = vec![
        json!({ "from": "//example.com/a/", "to": "b" }),
        json!({ "from": "x\\/(\\d+)", "to": "y\\/$1", "type": "regex" }),
    ];

    let once = sanitize(&raw);
    let twice = sanitize(
        &once
            .iter()
            .map(|rule| serde_json::to_value(rule).unwrap())
            .collect::<Vec<_>>(),
    );
    assert_eq!(once, twice);
}
