//! Metrics collection and exposition.
//!
//! # Metrics
//! - `liftoff_exit_decisions_total` (counter): finalize outcomes by `decision`
//! - `liftoff_pipeline_launches_total` (counter): launches by `class`

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::lifecycle::ExitDecision;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_exit_decision(decision: &ExitDecision) {
    metrics::counter!("liftoff_exit_decisions_total", "decision" => decision.as_str()).increment(1);
}

pub fn record_launch(class: &str) {
    metrics::counter!("liftoff_pipeline_launches_total", "class" => class.to_string()).increment(1);
}
