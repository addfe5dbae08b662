//! Rule-based HTTP redirect engine.
//!
//! Evaluates a request path against an ordered list of redirect rules
//! (exact, wildcard, regex) and, on the first match, produces a redirect to
//! the resolved destination unless it is the URL already being served.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirect;

pub use config::RedirectConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use redirect::{Outcome, RedirectEngine, RequestContext, RuleProvider};
