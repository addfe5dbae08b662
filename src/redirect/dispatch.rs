//! Redirect outcome selection.

use serde::Serialize;

use crate::redirect::loop_guard::is_current_url;

/// What the host should do with the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "destination", rename_all = "snake_case")]
pub enum Outcome {
    /// Continue with normal request handling.
    NoRedirect,
    /// Report the destination to the operator instead of redirecting.
    DebugReport(String),
    /// Redirect to the destination and stop handling the request.
    Redirect(String),
}

impl Outcome {
    /// Label used for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::NoRedirect => "no_redirect",
            Outcome::DebugReport(_) => "debug_report",
            Outcome::Redirect(_) => "redirect",
        }
    }
}

/// Decide the outcome for a resolved destination.
pub fn dispatch(current_uri: &str, destination: &str, debug: bool) -> Outcome {
    if is_current_url(current_uri, destination) {
        tracing::debug!(destination, "Destination is the current URL, not redirecting");
        return Outcome::NoRedirect;
    }

    if debug {
        return Outcome::DebugReport(destination.to_string());
    }

    Outcome::Redirect(destination.to_string())
}
