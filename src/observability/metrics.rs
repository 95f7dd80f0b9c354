//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, pattern
//! - `router_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Labels use the matched pattern, never the raw path, so cardinality is
//!   bounded by the route table
//! - Unmatched requests are labelled `none`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Pattern label for requests no route matched.
pub const UNMATCHED: &str = "none";

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one dispatched request.
pub fn record_request(method: &str, status: u16, pattern: &str, started: Instant) {
    let elapsed = started.elapsed().as_secs_f64();
    metrics::counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "pattern" => pattern.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "router_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "pattern" => pattern.to_string()
    )
    .record(elapsed);
}
