//! Bearer-token session for the VAST API.
//!
//! Tokens are minted with `POST token/` (username and password) and renewed with
//! `POST token/refresh/`. Both exchanges go out without an `Authorization`
//! header. The token pair sits behind a `tokio` mutex and renewal runs while
//! holding it, so concurrent callers cannot race each other's fresher token.

use crate::error::{Result, VastError};
use crate::observability::metrics::record_renewal;
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

const TOKEN_ENDPOINT: &str = "token/";
const REFRESH_ENDPOINT: &str = "token/refresh/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No access token yet.
    Unauthenticated,
    Authenticated,
    /// The server rejected the access token; a renewal is pending.
    Expired,
    /// The refresh exchange was rejected. No further automatic renewal.
    Failed,
}

/// Access/refresh pair as returned by the token endpoints (`access`, `refresh`).
#[derive(Clone, Deserialize)]
pub struct TokenPair {
    pub access: Secret<String>,
    pub refresh: Secret<String>,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: Secret::new(access.into()),
            refresh: Secret::new(refresh.into()),
        }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair").finish_non_exhaustive()
    }
}

/// Optional persistence hook for the token pair. `save` runs after every
/// successful authenticate or renew; `load` is consulted by the client when
/// no credentials were configured.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<TokenPair>>;
    async fn save(&self, tokens: &TokenPair) -> Result<()>;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

struct Credentials {
    access: Option<Secret<String>>,
    refresh: Option<Secret<String>>,
    state: SessionState,
}

pub struct AuthSession {
    transport: Arc<Transport>,
    credentials: Mutex<Credentials>,
    store: Option<Arc<dyn TokenStore>>,
}

impl AuthSession {
    pub fn new(transport: Arc<Transport>, store: Option<Arc<dyn TokenStore>>) -> Self {
        Self {
            transport,
            credentials: Mutex::new(Credentials {
                access: None,
                refresh: None,
                state: SessionState::Unauthenticated,
            }),
            store,
        }
    }

    /// Seed the session with tokens obtained elsewhere. Without an access token
    /// the first request renews lazily.
    pub async fn restore(&self, access: Option<Secret<String>>, refresh: Secret<String>) {
        let mut credentials = self.credentials.lock().await;
        credentials.state = if access.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        credentials.access = access;
        credentials.refresh = Some(refresh);
    }

    pub async fn state(&self) -> SessionState {
        self.credentials.lock().await.state
    }

    pub async fn has_refresh_token(&self) -> bool {
        self.credentials.lock().await.refresh.is_some()
    }

    /// Whether a rejected access token may be renewed automatically.
    pub async fn can_renew(&self) -> bool {
        let credentials = self.credentials.lock().await;
        credentials.refresh.is_some() && credentials.state != SessionState::Failed
    }

    /// Current access token, renewing first when only a refresh token is held.
    pub async fn ensure_authenticated(&self) -> Result<Secret<String>> {
        let mut credentials = self.credentials.lock().await;

        if credentials.state == SessionState::Failed {
            return Err(VastError::Auth {
                status: None,
                message: "token refresh was rejected; authenticate again".to_string(),
            });
        }
        if let Some(access) = &credentials.access {
            return Ok(access.clone());
        }
        if credentials.refresh.is_none() {
            return Err(VastError::MissingCredentials);
        }

        tracing::debug!("No access token held, renewing before request");
        self.renew_locked(&mut credentials).await?;
        credentials
            .access
            .clone()
            .ok_or(VastError::MissingCredentials)
    }

    /// Exchange a username and password for a fresh token pair.
    pub async fn authenticate(&self, username: &str, password: &Secret<String>) -> Result<()> {
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        let tokens = self.exchange(TOKEN_ENDPOINT, &body).await?;

        let mut credentials = self.credentials.lock().await;
        self.store_tokens(&mut credentials, tokens).await?;
        tracing::info!(username = %username, "Authenticated against VAST");
        Ok(())
    }

    /// Renew with the held refresh token, overwriting both tokens.
    pub async fn renew(&self) -> Result<()> {
        let mut credentials = self.credentials.lock().await;
        self.renew_locked(&mut credentials).await
    }

    /// Renew after the server rejected `stale`. Skipped when another caller has
    /// already replaced that token while this one waited for the lock.
    pub async fn renew_rejected(&self, stale: &Secret<String>) -> Result<()> {
        let mut credentials = self.credentials.lock().await;

        let already_renewed = credentials
            .access
            .as_ref()
            .is_some_and(|current| current.expose_secret() != stale.expose_secret());
        if already_renewed {
            tracing::debug!("Access token already renewed by a concurrent request");
            return Ok(());
        }

        credentials.state = SessionState::Expired;
        self.renew_locked(&mut credentials).await
    }

    async fn renew_locked(&self, credentials: &mut Credentials) -> Result<()> {
        let refresh = credentials
            .refresh
            .as_ref()
            .map(|token| token.expose_secret().clone())
            .ok_or(VastError::MissingCredentials)?;

        let body = RefreshRequest { refresh: &refresh };
        match self.exchange(REFRESH_ENDPOINT, &body).await {
            Ok(tokens) => {
                record_renewal(true);
                tracing::info!("Renewed VAST access token");
                self.store_tokens(credentials, tokens).await
            }
            Err(err) => {
                record_renewal(false);
                if matches!(err, VastError::Auth { .. }) {
                    credentials.access = None;
                    credentials.state = SessionState::Failed;
                }
                tracing::error!(error = %err, "VAST token renewal failed");
                Err(err)
            }
        }
    }

    async fn store_tokens(&self, credentials: &mut Credentials, tokens: TokenPair) -> Result<()> {
        credentials.access = Some(tokens.access.clone());
        credentials.refresh = Some(tokens.refresh.clone());
        credentials.state = SessionState::Authenticated;

        if let Some(store) = &self.store {
            store.save(&tokens).await?;
        }
        Ok(())
    }

    async fn exchange<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<TokenPair> {
        let request = self.transport.request(Method::POST, endpoint, None).json(body);
        let response = self.transport.execute(Method::POST, endpoint, request).await?;

        if !response.is_success() {
            return Err(VastError::Auth {
                status: Some(response.status),
                message: format!("{} rejected: {}", endpoint, response.body),
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}
