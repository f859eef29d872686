//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - RPC call counts by method and outcome
//! - RPC latency histograms
//! - Messages persisted

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// RPC call counter - tracks calls by method and status ("ok" or an RPC status)
pub static RPC_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("rpc_requests_total", "Total number of RPC calls").namespace("chat_rooms"),
        &["method", "status"],
    )
    .expect("Failed to create RPC_REQUESTS_TOTAL metric")
});

/// RPC latency histogram - tracks call duration in seconds
pub static RPC_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new("rpc_request_duration_seconds", "RPC latency in seconds")
            .namespace("chat_rooms")
            .buckets(buckets),
        &["method"],
    )
    .expect("Failed to create RPC_REQUEST_DURATION_SECONDS metric")
});

/// Newly persisted messages (idempotent replays excluded)
pub static MESSAGES_SAVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("messages_saved_total", "Total number of messages persisted")
            .namespace("chat_rooms"),
    )
    .expect("Failed to create MESSAGES_SAVED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(RPC_REQUESTS_TOTAL.clone()))
        .expect("Failed to register RPC_REQUESTS_TOTAL");
    registry
        .register(Box::new(RPC_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register RPC_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(MESSAGES_SAVED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_SAVED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record RPC call metrics
pub fn record_rpc(method: &str, status: &str, duration_secs: f64) {
    RPC_REQUESTS_TOTAL.with_label_values(&[method, status]).inc();
    RPC_REQUEST_DURATION_SECONDS
        .with_label_values(&[method])
        .observe(duration_secs);
}

/// Helper to count a persisted message
pub fn record_message_saved() {
    MESSAGES_SAVED_TOTAL.inc();
}
