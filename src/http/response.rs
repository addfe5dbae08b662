//! Response construction.
//!
//! # Responsibilities
//! - Turn an engine outcome into an HTTP response
//!
//! # Design Decisions
//! - Redirects carry the destination in `Location`, normalized through
//!   `url` so non-ASCII destinations are percent-encoded
//! - Debug reports are plain text with status 200
//! - `NoRedirect` produces no response; the request continues

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::redirect::Outcome;

/// Build the response for an outcome, or `None` to fall through.
pub fn outcome_response(outcome: &Outcome, status: StatusCode) -> Option<Response> {
    match outcome {
        Outcome::NoRedirect => None,
        Outcome::DebugReport(destination) => Some(
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("Redirect to {destination}"),
            )
                .into_response(),
        ),
        Outcome::Redirect(destination) => Some(redirect_response(destination, status)),
    }
}

fn redirect_response(destination: &str, status: StatusCode) -> Response {
    let location = Url::parse(destination)
        .map(String::from)
        .unwrap_or_else(|_| destination.to_string());

    match HeaderValue::from_str(&location) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(destination = %destination, error = %e, "Redirect destination is not a valid header value");
            (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect destination").into_response()
        }
    }
}
