//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Engine and HTTP layer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (evaluation counters and latency histogram)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Metric updates are no-ops until a recorder is installed
//! - Request ID flows through the HTTP layer via x-request-id

pub mod logging;
pub mod metrics;
