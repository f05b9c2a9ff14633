//! Resource-level operations against one VAST cluster.
//!
//! Every mutating operation builds its request model first, so invalid input
//! fails before anything is sent.

mod folders;
mod protection;
mod quotas;
mod views;

pub use protection::PolicyFilter;

use crate::config::VastSettings;
use crate::dispatcher::RequestDispatcher;
use crate::error::{Result, VastError};
use crate::session::{AuthSession, TokenStore};
use crate::transport::Transport;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of a mutating call that supports dry runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The request was sent; holds the server's answer.
    Sent(Value),
    /// Nothing was sent; holds the validated payload that would have been.
    DryRun(Value),
}

impl Submission {
    pub fn into_value(self) -> Value {
        match self {
            Submission::Sent(value) | Submission::DryRun(value) => value,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Submission::DryRun(_))
    }
}

pub struct VastClient {
    host: String,
    dispatcher: RequestDispatcher,
    session: Arc<AuthSession>,
}

pub struct VastClientBuilder {
    settings: VastSettings,
    token_store: Option<Arc<dyn TokenStore>>,
}

impl VastClientBuilder {
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Requires a username and password (authenticates immediately), a
    /// refresh token (with or without an access token), or a token store that
    /// holds a saved pair.
    pub async fn build(self) -> Result<VastClient> {
        let settings = self.settings;
        let transport = Arc::new(Transport::new(&settings)?);
        let session = Arc::new(AuthSession::new(transport.clone(), self.token_store.clone()));

        match (&settings.refresh_token, &settings.username, &settings.password) {
            (Some(refresh), _, _) => {
                session.restore(settings.token.clone(), refresh.clone()).await;
            }
            (None, Some(username), Some(password)) => {
                session.authenticate(username, password).await?;
            }
            _ => {
                let saved = match &self.token_store {
                    Some(store) => store.load().await?,
                    None => None,
                };
                let tokens = saved.ok_or(VastError::MissingCredentials)?;
                session.restore(Some(tokens.access), tokens.refresh).await;
            }
        }

        tracing::info!(base_url = %transport.base_url(), "VAST client ready");

        let dispatcher = RequestDispatcher::new(transport, session.clone(), settings.get_retries);
        Ok(VastClient {
            host: settings.host,
            dispatcher,
            session,
        })
    }
}

impl VastClient {
    pub fn builder(settings: VastSettings) -> VastClientBuilder {
        VastClientBuilder {
            settings,
            token_store: None,
        }
    }

    pub async fn new(settings: VastSettings) -> Result<Self> {
        Self::builder(settings).build().await
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Lower-level access for endpoints without a dedicated method.
    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Replace the session tokens using a username and password.
    pub async fn get_token(&self, username: &str, password: &str) -> Result<()> {
        self.session
            .authenticate(username, &secrecy::Secret::new(password.to_string()))
            .await
    }

    pub async fn renew_token(&self) -> Result<()> {
        self.session.renew().await
    }

    /// `GET capacity/`.
    pub async fn get_total_capacity(&self) -> Result<Value> {
        self.dispatcher.get::<()>("capacity/", None).await
    }

    async fn submit<B: Serialize>(&self, endpoint: &str, body: &B, dry_run: bool) -> Result<Submission> {
        if dry_run {
            let payload = serde_json::to_value(body)?;
            tracing::info!(endpoint = %endpoint, payload = %payload, "Dry run, skipping creation");
            return Ok(Submission::DryRun(payload));
        }
        self.dispatcher.post(endpoint, body).await.map(Submission::Sent)
    }
}

/// Records of a list endpoint, whether returned bare or paginated under
/// `results`.
pub(crate) fn records(listing: &Value) -> &[Value] {
    listing
        .as_array()
        .or_else(|| listing.get("results").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub(crate) fn any_record_matches(listing: &Value, key: &str, wanted: &str) -> bool {
    records(listing)
        .iter()
        .any(|record| record.get(key).and_then(Value::as_str) == Some(wanted))
}
