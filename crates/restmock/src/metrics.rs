//! Prometheus metrics for restmock.
//!
//! Tracks dispatch outcomes, per-route hits and routing table reloads.
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram, register_int_gauge, CounterVec, Encoder, Histogram,
    IntGauge, TextEncoder,
};

lazy_static! {
    /// Total number of requests dispatched
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "restmock_requests_total",
        "Total number of requests dispatched by the mock server",
        &["method", "outcome"]  // outcome: matched|no_route|handler_error
    )
    .unwrap();

    /// Hits per compiled route
    pub static ref ROUTE_HITS_TOTAL: CounterVec = register_counter_vec!(
        "restmock_route_hits_total",
        "Number of requests served by each route",
        &["route"]
    )
    .unwrap();

    /// Time spent selecting a route
    pub static ref DISPATCH_DURATION_SECONDS: Histogram = register_histogram!(
        "restmock_dispatch_duration_seconds",
        "Time spent scanning the routing table for one request",
        vec![0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01]
    )
    .unwrap();

    /// Routes in the active table
    pub static ref ROUTES_LOADED: IntGauge = register_int_gauge!(
        "restmock_routes_loaded",
        "Number of routes in the active routing table"
    )
    .unwrap();

    /// Routing table swaps after startup
    pub static ref RELOADS_TOTAL: CounterVec = register_counter_vec!(
        "restmock_reloads_total",
        "Configuration reload attempts",
        &["result"]  // result: success|error
    )
    .unwrap();
}

/// Dispatch outcome label values.
pub const OUTCOME_MATCHED: &str = "matched";
pub const OUTCOME_NO_ROUTE: &str = "no_route";
pub const OUTCOME_HANDLER_ERROR: &str = "handler_error";

/// Collect and return all metrics in Prometheus text format
pub fn collect_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Helper to record a dispatched request
pub fn record_request(method: &str, outcome: &str) {
    REQUESTS_TOTAL.with_label_values(&[method, outcome]).inc();
}

/// Helper to record a hit on a route, keyed by its rendered pattern
pub fn record_route_hit(route: &str) {
    ROUTE_HITS_TOTAL.with_label_values(&[route]).inc();
}

/// Helper to record routing table scan time
pub fn record_dispatch_duration(seconds: f64) {
    DISPATCH_DURATION_SECONDS.observe(seconds);
}

/// Helper to publish the size of the active routing table
pub fn set_routes_loaded(count: usize) {
    ROUTES_LOADED.set(count as i64);
}

/// Helper to record a reload attempt
pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "error" };
    RELOADS_TOTAL.with_label_values(&[result]).inc();
}
