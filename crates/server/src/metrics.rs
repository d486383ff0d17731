use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static ACCOUNT_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "account_registry_operations_total",
        "Account operations handled, by operation",
        &["operation"]
    )
    .expect("register operations_total")
});

pub static ACCOUNT_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "account_registry_errors_total",
        "Account requests that ended in an error response, by status code",
        &["status"]
    )
    .expect("register errors_total")
});

pub fn record_operation(operation: &str) {
    ACCOUNT_OPERATIONS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn record_error(status: StatusCode) {
    ACCOUNT_ERRORS_TOTAL.with_label_values(&[status.as_str()]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
