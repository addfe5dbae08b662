//! Redirect rule engine.
//!
//! # Data Flow
//! ```text
//! RuleProvider (config, closure, ...)
//!     → rule.rs (sanitize raw definitions, normalize.rs for from/to)
//!     → matcher.rs (first matching rule + capture groups)
//!     → resolve.rs (substitute captures, join onto site root)
//!     → loop_guard.rs (is the destination the current URL?)
//!     → dispatch.rs (NoRedirect | DebugReport | Redirect)
//! ```
//!
//! # Design Decisions
//! - Rules are rebuilt from the provider on every evaluation
//! - Stages are pure functions; no state survives a request
//! - First match wins, ordered as supplied
//! - A broken rule can only fail itself

pub mod dispatch;
pub mod engine;
pub mod loop_guard;
pub mod matcher;
pub mod normalize;
pub mod resolve;
pub mod rule;

pub use dispatch::Outcome;
pub use engine::{Evaluation, RedirectEngine, RequestContext, RuleProvider, StaticRules};
pub use matcher::MatchResult;
pub use resolve::{Destination, SiteRoot, SiteRootError};
pub use rule::{RawDefinition, RedirectRule, RuleType};
