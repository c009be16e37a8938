//! Metrics collection and exposition.
//!
//! # Metrics
//! - `qr_requests_total` (counter): requests by endpoint, status
//! - `qr_request_duration_seconds` (histogram): handler latency by endpoint
//! - `qr_render_duration_seconds` (histogram): render time by format
//! - `qr_render_failures_total` (counter): failed renders by reason
//!
//! # Design Decisions
//! - Without an installed recorder the macros are no-ops, so tests need no setup
//! - Prometheus exporter is optional and bound to its own address

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::qr::OutputFormat;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "qr_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("qr_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record a successful render.
pub fn record_render(format: OutputFormat, start: Instant) {
    metrics::histogram!("qr_render_duration_seconds", "format" => format.as_str())
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed render.
pub fn record_render_failure(reason: &'static str) {
    metrics::counter!("qr_render_failures_total", "reason" => reason).increment(1);
}
