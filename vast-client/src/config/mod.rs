use crate::error::Result;
use config::{Config as Cfg, File};
use secrecy::Secret;
use serde::Deserialize;

/// Connection settings for one VAST cluster.
///
/// Loaded from an optional `vast.{yaml,toml,json}` file and `VAST_*` environment
/// variables, e.g. `VAST_HOST`, `VAST_VERIFY_TLS=false`, `VAST_TIMEOUTS__READ_SECS`.
#[derive(Debug, Deserialize, Clone)]
pub struct VastSettings {
    pub host: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Overrides `https://{host}/api/{api_version}/`, e.g. for a proxy.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Certificate verification. Only disable against non-production clusters.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<Secret<String>>,
    #[serde(default)]
    pub token: Option<Secret<String>>,
    #[serde(default)]
    pub refresh_token: Option<Secret<String>>,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
    /// Total GET attempts allowed when the server rejects the access token.
    #[serde(default = "default_get_retries")]
    pub get_retries: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TimeoutSettings {
    #[serde(default = "default_connect_secs")]
    pub connect_secs: u64,
    /// Budget for GET and DELETE.
    #[serde(default = "default_read_secs")]
    pub read_secs: u64,
    /// Budget for POST, PATCH and PUT.
    #[serde(default = "default_write_secs")]
    pub write_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            connect_secs: default_connect_secs(),
            read_secs: default_read_secs(),
            write_secs: default_write_secs(),
        }
    }
}

fn default_api_version() -> String {
    "v5".to_string()
}

fn default_verify_tls() -> bool {
    true
}

fn default_get_retries() -> u32 {
    2
}

fn default_connect_secs() -> u64 {
    5
}

fn default_read_secs() -> u64 {
    10
}

fn default_write_secs() -> u64 {
    20
}

impl VastSettings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_version: default_api_version(),
            base_url: None,
            verify_tls: default_verify_tls(),
            username: None,
            password: None,
            token: None,
            refresh_token: None,
            timeouts: TimeoutSettings::default(),
            get_retries: default_get_retries(),
        }
    }

    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Cfg::builder()
            .add_source(File::with_name("vast").required(false))
            .add_source(
                config::Environment::with_prefix("VAST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(Secret::new(password.into()));
        self
    }

    pub fn with_tokens(mut self, token: Option<String>, refresh_token: impl Into<String>) -> Self {
        self.token = token.map(Secret::new);
        self.refresh_token = Some(Secret::new(refresh_token.into()));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Base URL every endpoint is appended to. Always ends with `/` so that
    /// joining never replaces the last path segment.
    pub fn base_url(&self) -> String {
        let mut url = match &self.base_url {
            Some(url) => url.clone(),
            None => format!("https://{}/api/{}/", self.host, self.api_version),
        };
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }
}
