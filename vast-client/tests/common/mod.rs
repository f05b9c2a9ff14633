#![allow(dead_code)]

use serde_json::json;
use vast_client::{VastClient, VastSettings};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PREFIX: &str = "/api/v5/";
pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const RENEWED_ACCESS_TOKEN: &str = "access-2";
pub const RENEWED_REFRESH_TOKEN: &str = "refresh-2";

/// Mock VAST API listening on a random local port.
pub struct TestApi {
    pub server: MockServer,
}

impl TestApi {
    pub async fn spawn() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}{}", self.server.uri(), API_PREFIX)
    }

    pub fn settings(&self) -> VastSettings {
        VastSettings::new("vast.test").with_base_url(self.base_url())
    }

    /// Client seeded with `ACCESS_TOKEN`/`REFRESH_TOKEN`; no request is made.
    pub async fn client(&self) -> VastClient {
        let settings = self
            .settings()
            .with_tokens(Some(ACCESS_TOKEN.to_string()), REFRESH_TOKEN);
        VastClient::new(settings)
            .await
            .expect("Failed to build client")
    }

    /// Client holding only `REFRESH_TOKEN`, so the first call renews.
    pub async fn client_with_refresh_only(&self) -> VastClient {
        let settings = self.settings().with_tokens(None, REFRESH_TOKEN);
        VastClient::new(settings)
            .await
            .expect("Failed to build client")
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Expect `expected` refresh exchanges, answered with the renewed pair.
    pub async fn mock_refresh(&self, expected: u64) {
        Mock::given(method("POST"))
            .and(path(api("token/refresh/")))
            .and(body_json(json!({ "refresh": REFRESH_TOKEN })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": RENEWED_ACCESS_TOKEN,
                "refresh": RENEWED_REFRESH_TOKEN
            })))
            .expect(expected)
            .mount(&self.server)
            .await;
    }
}

/// Absolute mock path for a relative endpoint.
pub fn api(endpoint: &str) -> String {
    format!("{}{}", API_PREFIX, endpoint)
}
