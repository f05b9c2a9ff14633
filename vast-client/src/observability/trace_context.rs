//! W3C Trace Context propagation for calls to the VAST API.
//!
//! Every request sent by the dispatcher carries the current span's
//! `traceparent`/`tracestate` so cluster-side audit logs can be correlated
//! with the caller's traces.

use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Inject the current span's trace context into `headers`.
///
/// Leaves `headers` untouched when there is no valid OpenTelemetry context,
/// e.g. when no OTLP layer is installed.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = traceparent.parse() {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty()
        && let Ok(value) = tracestate.parse()
    {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

/// A `reqwest::RequestBuilder` that injects trace headers when sent.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self { request }
    }

    pub fn header(self, key: &str, value: &str) -> Self {
        Self {
            request: self.request.header(key, value),
        }
    }

    pub fn query<T: serde::Serialize + ?Sized>(self, query: &T) -> Self {
        Self {
            request: self.request.query(query),
        }
    }

    /// JSON body; also sets `Content-Type: application/json`.
    pub fn json<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        Self {
            request: self.request.json(json),
        }
    }

    pub fn bearer_auth<T: std::fmt::Display>(self, token: T) -> Self {
        Self {
            request: self.request.bearer_auth(token),
        }
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            request: self.request.timeout(timeout),
        }
    }

    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);

        self.request.headers(headers).send().await
    }
}

/// Extension trait for `reqwest::Client` to create traced requests.
pub trait TracedClientExt {
    fn traced_request(&self, method: reqwest::Method, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced_request(&self, method: reqwest::Method, url: &str) -> TracedRequest {
        TracedRequest::new(self.request(method, url))
    }
}
