//! Authenticated request dispatch.
//!
//! Only GET is retried, and only when the server answers 403 while a refresh
//! token is held: the session renews and the identical GET is sent again.
//! Mutating calls are never replayed.

use crate::error::Result;
use crate::session::AuthSession;
use crate::transport::Transport;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub struct RequestDispatcher {
    transport: Arc<Transport>,
    session: Arc<AuthSession>,
    get_retries: u32,
}

impl RequestDispatcher {
    /// `get_retries` is the total number of GET attempts allowed when the
    /// access token is rejected.
    pub fn new(transport: Arc<Transport>, session: Arc<AuthSession>, get_retries: u32) -> Self {
        Self {
            transport,
            session,
            get_retries,
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub async fn get<Q: Serialize + ?Sized>(&self, endpoint: &str, params: Option<&Q>) -> Result<Value> {
        self.get_with_retries(endpoint, params, self.get_retries).await
    }

    pub async fn get_with_retries<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: Option<&Q>,
        retries: u32,
    ) -> Result<Value> {
        let attempts = retries.max(1);
        let mut attempt = 1;

        loop {
            let token = self.session.ensure_authenticated().await?;

            let mut request = self
                .transport
                .request(Method::GET, endpoint, Some(token.expose_secret().as_str()));
            if let Some(params) = params {
                request = request.query(params);
            }

            let response = self.transport.execute(Method::GET, endpoint, request).await?;
            if response.is_success() {
                return response.into_json();
            }

            let renewable = response.status == StatusCode::FORBIDDEN
                && attempt < attempts
                && self.session.can_renew().await;
            if !renewable {
                return Err(response.into_error());
            }

            tracing::warn!(
                endpoint = %endpoint,
                attempt = attempt,
                "Access token rejected, renewing and retrying GET"
            );
            self.session.renew_rejected(&token).await?;
            attempt += 1;
        }
    }

    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        self.send(Method::POST, endpoint, Some(body), false).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        self.send(Method::PATCH, endpoint, Some(body), false).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        self.send(Method::PUT, endpoint, Some(body), false).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.send::<Value>(Method::DELETE, endpoint, None, false).await
    }

    /// DELETE carrying a JSON body, as `folders/delete_folder/` expects.
    pub async fn delete_with_body<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        self.send(Method::DELETE, endpoint, Some(body), false).await
    }

    /// Generic entry point. An authenticated GET takes the retried path with
    /// `payload` as query parameters; every other call is a single round trip
    /// with `payload` as the JSON body. With `skip_auth` no token is required
    /// or attached.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&B>,
        skip_auth: bool,
    ) -> Result<Value> {
        if method == Method::GET && !skip_auth {
            return self.get(endpoint, payload).await;
        }

        let token = if skip_auth {
            None
        } else {
            Some(self.session.ensure_authenticated().await?)
        };

        let mut request = self.transport.request(
            method.clone(),
            endpoint,
            token.as_ref().map(|t| t.expose_secret().as_str()),
        );
        if let Some(payload) = payload {
            request = if method == Method::GET {
                request.query(payload)
            } else {
                request.json(payload)
            };
        }

        let response = self.transport.execute(method, endpoint, request).await?;
        if response.is_success() {
            response.into_json()
        } else {
            Err(response.into_error())
        }
    }
}
