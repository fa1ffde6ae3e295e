use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, Encoder, HistogramVec,
    IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Business Metrics
    pub static ref ASSESSMENTS_ROUTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "assessments_routed_total",
        "Total number of assessment routing decisions",
        &["path"]
    )
    .unwrap();

    pub static ref GAME_SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "game_sessions_total",
        "Total number of adaptive game sessions started",
        &["game_type"]
    )
    .unwrap();

    pub static ref GAME_SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "game_sessions_active",
        "Number of currently active adaptive game sessions"
    )
    .unwrap();

    pub static ref ANSWERS_RECORDED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_recorded_total",
        "Total number of answers recorded in adaptive sessions",
        &["correct"]
    )
    .unwrap();

    pub static ref SUBMISSIONS_DELIVERED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "submissions_delivered_total",
        "Total number of submission webhook deliveries",
        &["status"]
    )
    .unwrap();

    pub static ref CONTENT_FETCH_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "content_fetch_failures_total",
        "Total number of best-effort content provider failures",
        &["kind"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}
