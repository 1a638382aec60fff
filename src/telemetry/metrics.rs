//! Prometheus metrics setup and metric definitions

use crate::error::{AppError, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Latency buckets (seconds) shared by HTTP and backend call histograms
const BUCKETS: [f64; 12] = [
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .set_buckets(&BUCKETS)
        .and_then(|builder| builder.install_recorder())
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("failed to install Prometheus recorder: {}", e))
        })
}

/// Register metric descriptions so HELP/TYPE lines are present from startup.
pub fn describe_metrics() {
    // HTTP
    describe_counter!("gateway_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "gateway_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "gateway_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    // Backends
    describe_counter!(
        "gateway_backend_calls_total",
        "Backend gRPC calls by service, method and status"
    );
    describe_histogram!(
        "gateway_backend_call_duration_seconds",
        "Backend gRPC call duration in seconds"
    );

    // Directives
    describe_counter!(
        "gateway_directive_rejections_total",
        "Operations stopped by a directive, by directive and operation"
    );
}
