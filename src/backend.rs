// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SignalHub

//! SignalHub backend API client.
//!
//! Thin HTTP client for the remote backend: the two auth endpoints that
//! establish a session, and authorized JSON passthrough for the dashboard
//! resources. Response shapes are opaque to the gateway; handlers forward
//! them unchanged.
//!
//! ## Unauthorized event
//!
//! Any 401 from any endpoint means "session invalid". Rather than burying
//! that policy in the transport layer, the client broadcasts an
//! [`Unauthorized`] event; the session lifecycle (the guard registry) is its
//! single subscriber. Callers still receive `BackendError::Unauthorized` and
//! map it to the clear-cookies-and-redirect recovery.

use std::{env, time::Duration};

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::warn;
use url::Url;
use uuid::Uuid;

use crate::config::BACKEND_API_URL_ENV;

const DEFAULT_BACKEND_API_URL: &str = "http://localhost:9000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const UNAUTHORIZED_CHANNEL_CAPACITY: usize = 16;

/// Marker event broadcast whenever the backend answers 401.
#[derive(Debug, Clone, Copy)]
pub struct Unauthorized;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend configuration invalid: {0}")]
    Config(String),

    #[error("backend request failed: {0}")]
    Request(String),

    #[error("backend response was invalid: {0}")]
    InvalidResponse(String),

    #[error("backend rejected the session")]
    Unauthorized,

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Client for the remote SignalHub backend API.
#[derive(Debug)]
pub struct BackendClient {
    base_url: Url,
    http: Client,
    unauthorized_tx: broadcast::Sender<Unauthorized>,
}

impl BackendClient {
    /// Build a client from `BACKEND_API_URL`, defaulting to localhost.
    pub fn from_env() -> Result<Self, BackendError> {
        let base_url =
            env::var(BACKEND_API_URL_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_API_URL.to_string());
        Self::with_base_url(&base_url)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::Config(format!("invalid backend URL: {e}")))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BackendError::Request(format!("failed to build HTTP client: {e}")))?;

        let (unauthorized_tx, _) = broadcast::channel(UNAUTHORIZED_CHANNEL_CAPACITY);

        Ok(Self {
            base_url,
            http,
            unauthorized_tx,
        })
    }

    /// Subscribe to the 401 event stream.
    pub fn subscribe_unauthorized(&self) -> broadcast::Receiver<Unauthorized> {
        self.unauthorized_tx.subscribe()
    }

    /// `POST /auth/login` with the user's credentials.
    ///
    /// Returns the raw payload; the caller resolves token and expiry from it.
    pub async fn login(&self, body: &impl Serialize) -> Result<Value, BackendError> {
        self.send(Method::POST, "/auth/login", Some(body), None).await
    }

    /// `POST /auth/verify-otp` with the emailed one-time code.
    pub async fn verify_otp(&self, body: &impl Serialize) -> Result<Value, BackendError> {
        self.send(Method::POST, "/auth/verify-otp", Some(body), None)
            .await
    }

    /// Authorized `GET` passthrough for a dashboard resource.
    pub async fn get_authorized(&self, path: &str, bearer: &str) -> Result<Value, BackendError> {
        self.send::<Value>(Method::GET, path, None, Some(bearer))
            .await
    }

    /// Authorized `POST` passthrough (support tickets, watchlist entries).
    pub async fn post_authorized(
        &self,
        path: &str,
        bearer: &str,
        body: &Value,
    ) -> Result<Value, BackendError> {
        self.send(Method::POST, path, Some(body), Some(bearer)).await
    }

    /// Liveness probe against the backend's health endpoint.
    pub async fn ping(&self) -> bool {
        match self.endpoint("/health") {
            Ok(url) => self.http.get(url).send().await.is_ok(),
            Err(_) => false,
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        bearer: Option<&str>,
    ) -> Result<Value, BackendError> {
        let url = self.endpoint(path)?;

        let mut request = self
            .http
            .request(method, url)
            .header("X-Request-Id", Uuid::new_v4().to_string());
        if let Some(bearer) = bearer {
            request = request.bearer_auth(bearer);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "Backend returned 401; broadcasting unauthorized event");
            // No subscriber is not an error; the event is advisory.
            let _ = self.unauthorized_tx.send(Unauthorized);
            return Err(BackendError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::Config(format!("invalid backend path {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_base_url_rejects_garbage() {
        assert!(matches!(
            BackendClient::with_base_url("not a url"),
            Err(BackendError::Config(_))
        ));
    }

    #[test]
    fn endpoint_joins_paths_against_the_base() {
        let client = BackendClient::with_base_url("https://api.signalhub.example").unwrap();
        let url = client.endpoint("/signals").unwrap();
        assert_eq!(url.as_str(), "https://api.signalhub.example/signals");
    }

    #[tokio::test]
    async fn unauthorized_event_reaches_subscriber() {
        let client = BackendClient::with_base_url(DEFAULT_BACKEND_API_URL).unwrap();
        let mut rx = client.subscribe_unauthorized();

        client.unauthorized_tx.send(Unauthorized).unwrap();
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn unreachable_backend_yields_request_error() {
        // Nothing listens on port 9 locally; the connection is refused.
        let client = BackendClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client.get_authorized("/signals", "tok").await.unwrap_err();
        assert!(matches!(err, BackendError::Request(_)));
    }
}
