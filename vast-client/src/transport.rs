//! Raw HTTP executor shared by the auth session and the dispatcher.

use crate::config::{TimeoutSettings, VastSettings};
use crate::error::{Result, VastError};
use crate::observability::metrics::record_request;
use crate::observability::{TracedClientExt, TracedRequest};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};
use std::time::{Duration, Instant};

pub struct Transport {
    client: Client,
    base_url: String,
    timeouts: TimeoutSettings,
}

/// Status and body of a completed round trip, before interpretation.
#[derive(Debug)]
pub struct RawResponse {
    pub method: Method,
    pub status: StatusCode,
    pub url: String,
    pub body: String,
}

impl Transport {
    pub fn new(settings: &VastSettings) -> Result<Self> {
        if !settings.verify_tls {
            tracing::warn!(host = %settings.host, "TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.timeouts.connect_secs))
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url(),
            timeouts: settings.timeouts.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoints are relative and always appended to the base path.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Request with `Accept: application/json` and the method's timeout budget.
    pub fn request(&self, method: Method, endpoint: &str, bearer: Option<&str>) -> TracedRequest {
        let timeout = if has_body(&method) {
            self.timeouts.write_secs
        } else {
            self.timeouts.read_secs
        };

        let mut request = self
            .client
            .traced_request(method, &self.url(endpoint))
            .header(ACCEPT.as_str(), "application/json")
            .timeout(Duration::from_secs(timeout));

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Send and read the whole body. Connection-level failures surface as
    /// [`VastError::Transport`] and are never retried.
    pub async fn execute(&self, method: Method, endpoint: &str, request: TracedRequest) -> Result<RawResponse> {
        let url = self.url(endpoint);
        let started = Instant::now();

        let response = request.send().await.map_err(|e| {
            tracing::error!(method = %method, url = %url, error = %e, "VAST request failed");
            VastError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        record_request(&method, status, started.elapsed());
        tracing::debug!(method = %method, url = %url, status = %status, "VAST response");

        Ok(RawResponse {
            method,
            status,
            url,
            body,
        })
    }
}

pub(crate) fn has_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PATCH | Method::PUT)
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode a 2xx body. An empty DELETE answer becomes `{"status": <code>}`,
    /// any other empty answer becomes `null`.
    pub fn into_json(self) -> Result<Value> {
        if self.body.trim().is_empty() {
            if self.method == Method::DELETE {
                return Ok(json!({ "status": self.status.as_u16() }));
            }
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn into_error(self) -> VastError {
        tracing::error!(
            method = %self.method,
            url = %self.url,
            status = %self.status,
            body = %self.body,
            "VAST API returned an error"
        );
        VastError::Http {
            status: self.status,
            url: self.url,
            body: self.body,
        }
    }
}
