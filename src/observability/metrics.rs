//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_evaluations_total` (counter): evaluations by outcome
//! - `redirect_evaluation_duration_seconds` (histogram): engine latency
//!
//! # Design Decisions
//! - Prometheus exporter is optional and bound to its own address
//! - Outcome label values are fixed strings to keep cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one engine evaluation.
pub fn record_evaluation(outcome: &'static str, start: Instant) {
    ::metrics::counter!("redirect_evaluations_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("redirect_evaluation_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
