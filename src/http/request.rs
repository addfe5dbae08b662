//! Request handling.
//!
//! # Responsibilities
//! - Extract the redirect-relevant parts of a request (path, path + query)
//!
//! # Design Decisions
//! - The path is compared without surrounding slashes and without the query
//! - Percent-encoding is left as received; rules are written against the
//!   encoded form

use axum::http::Uri;

use crate::redirect::RequestContext;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Path and query of a request URI, `/` when absent.
pub fn path_and_query(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

impl From<&Uri> for RequestContext {
    fn from(uri: &Uri) -> Self {
        RequestContext::from_request_uri(path_and_query(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_origin_form() {
        let uri: Uri = "/old-page/?b=2&a=1".parse().unwrap();
        let ctx = RequestContext::from(&uri);
        assert_eq!(ctx.path, "old-page");
        assert_eq!(ctx.uri, "/old-page/?b=2&a=1");
    }

    #[test]
    fn test_context_from_absolute_form() {
        let uri: Uri = "http://example.com/events/2024?x=1".parse().unwrap();
        let ctx = RequestContext::from(&uri);
        assert_eq!(ctx.path, "events/2024");
        assert_eq!(ctx.uri, "/events/2024?x=1");
    }

    #[test]
    fn test_context_from_root() {
        let uri: Uri = "http://example.com".parse().unwrap();
        assert_eq!(RequestContext::from(&uri).path, "");
    }
}
