//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, the site URL and the redirect status
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectConfig → Result<(), Vec<ValidationError>>
//! - Redirect definitions are not validated here; the sanitizer drops bad ones

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RedirectConfig;
use crate::redirect::SiteRoot;

/// Status codes accepted for `site.redirect_status`.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("site.base_url: {0}")]
    InvalidSiteUrl(String),

    #[error("site.redirect_status {0} is not one of 301, 302, 303, 307, 308")]
    InvalidRedirectStatus(u16),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Check a parsed configuration.
pub fn validate_config(config: &RedirectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if let Err(e) = SiteRoot::parse(&config.site.base_url) {
        errors.push(ValidationError::InvalidSiteUrl(e.to_string()));
    }

    if !REDIRECT_STATUSES.contains(&config.site.redirect_status) {
        errors.push(ValidationError::InvalidRedirectStatus(config.site.redirect_status));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
