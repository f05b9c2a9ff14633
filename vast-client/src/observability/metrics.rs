use metrics::{counter, histogram};
use reqwest::{Method, StatusCode};
use std::time::Duration;

pub const REQUESTS_TOTAL: &str = "vast_client_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "vast_client_request_duration_seconds";
pub const TOKEN_RENEWALS_TOTAL: &str = "vast_client_token_renewals_total";

/// Record one completed round trip. No-op unless the host application installed
/// a `metrics` recorder.
pub fn record_request(method: &Method, status: StatusCode, elapsed: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.as_u16().to_string()),
    ];

    counter!(REQUESTS_TOTAL, &labels).increment(1);
    histogram!(REQUEST_DURATION_SECONDS, &labels).record(elapsed.as_secs_f64());
}

pub fn record_renewal(succeeded: bool) {
    let outcome = if succeeded { "success" } else { "failure" };
    counter!(TOKEN_RENEWALS_TOTAL, "outcome" => outcome).increment(1);
}
