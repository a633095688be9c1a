//! Metrics collection.
//!
//! # Metrics
//! - `http_request_requests_total` (counter): dispatched requests by method
//!   and outcome (`success`, `server_error`, `transport_error`)
//! - `http_request_duration_seconds` (histogram): dispatch latency by method

use std::time::Instant;

use crate::error::ErrorInfo;

pub const OUTCOME_SUCCESS: &str = "success";

/// Outcome label for a classified failure.
pub fn outcome_label(info: &ErrorInfo) -> &'static str {
    match info {
        ErrorInfo::Server(_) => "server_error",
        ErrorInfo::Transport(_) => "transport_error",
    }
}

/// Record a completed dispatch.
pub fn record_request(method: &str, outcome: &'static str, start_time: Instant) {
    let duration = start_time.elapsed().as_secs_f64();

    ::metrics::counter!(
        "http_request_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    ::metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(duration);
}
