//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the redirect service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::redirect::{RawDefinition, RedirectEngine, SiteRoot, SiteRootError, StaticRules};

/// Root configuration for the redirect service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Site the redirects belong to.
    pub site: SiteConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Raw redirect definitions, in evaluation order.
    /// Malformed entries are kept here and dropped by the sanitizer.
    pub redirects: Vec<RawDefinition>,
}

impl RedirectConfig {
    /// Build an engine serving this configuration's rules.
    pub fn engine(&self) -> Result<RedirectEngine, SiteRootError> {
        let site_root = SiteRoot::parse(&self.site.base_url)?;
        Ok(RedirectEngine::new(StaticRules::new(self.redirects.clone()), site_root)
            .debug(self.site.debug))
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute base URL that relative destinations are joined onto.
    pub base_url: String,

    /// Report destinations instead of redirecting.
    pub debug: bool,

    /// Status code used for redirects (301, 302, 303, 307 or 308).
    pub redirect_status: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            debug: false,
            redirect_status: 302,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
