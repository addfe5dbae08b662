//! Redirect loop detection.
//!
//! A destination counts as the current URL when its path (without
//! surrounding slashes) equals the request path and both query strings
//! decode to the same set of key/value pairs. Parameter order is ignored;
//! a repeated key keeps its last value.

use std::collections::BTreeMap;

use url::{form_urlencoded, Url};

use crate::redirect::normalize::is_absolute;

/// Path and query of a URL, with missing parts as empty strings.
#[derive(Debug, Default, PartialEq, Eq)]
struct PathAndQuery {
    path: String,
    query: String,
}

impl PathAndQuery {
    fn parse(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or_default().trim_matches('/');

        if is_absolute(url) {
            // Unparseable absolute URLs compare as empty
            return match Url::parse(url) {
                Ok(parsed) => Self {
                    path: parsed.path().trim_matches('/').to_string(),
                    query: parsed.query().unwrap_or_default().to_string(),
                },
                Err(_) => Self::default(),
            };
        }

        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        Self {
            path: path.trim_matches('/').to_string(),
            query: query.to_string(),
        }
    }

    fn query_args(&self) -> BTreeMap<String, String> {
        form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }
}

/// Returns true if `candidate` points at the URL currently being served.
pub fn is_current_url(current_uri: &str, candidate: &str) -> bool {
    let current = PathAndQuery::parse(current_uri);
    let target = PathAndQuery::parse(candidate);

    if current.path != target.path {
        return false;
    }

    current.query_args() == target.query_args()
}
