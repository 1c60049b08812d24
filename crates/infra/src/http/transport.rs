//! Request transport seam and the credential-injecting decorator
//!
//! Every request the client sends goes through a [`Transport`]. The
//! [`AuthenticatedTransport`] wraps an inner transport and attaches the
//! `Authorization` header for the configured authentication mode before
//! delegating. Transport failures pass through unchanged.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use giniapi_domain::Config;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};

/// Sends a fully built request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the raw response.
    ///
    /// Implementations never inspect the status code.
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error>;
}

/// Credential material attached to each request
#[derive(Clone)]
pub enum Credential {
    /// Access token obtained from a token exchange
    Bearer(String),
    /// Client id and secret taken from the configuration on every request
    Basic,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Self::Basic => f.write_str("Basic"),
        }
    }
}

/// Transport decorator injecting the `Authorization` header
#[derive(Clone)]
pub struct AuthenticatedTransport {
    config: Arc<Config>,
    inner: Arc<dyn Transport>,
    credential: Credential,
}

impl AuthenticatedTransport {
    /// Decorate `inner` with a bearer token.
    pub fn bearer(
        config: Arc<Config>,
        inner: Arc<dyn Transport>,
        token: impl Into<String>,
    ) -> Self {
        Self { config, inner, credential: Credential::Bearer(token.into()) }
    }

    /// Decorate `inner` with basic auth derived from the client credentials.
    pub fn basic(config: Arc<Config>, inner: Arc<dyn Transport>) -> Self {
        Self { config, inner, credential: Credential::Basic }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    fn authorization(&self) -> Option<HeaderValue> {
        let raw = match &self.credential {
            Credential::Bearer(token) => format!("Bearer {token}"),
            Credential::Basic => {
                let pair = format!("{}:{}", self.config.client_id, self.config.client_secret);
                format!("Basic {}", STANDARD.encode(pair))
            }
        };
        let mut value = HeaderValue::from_str(&raw).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

impl fmt::Debug for AuthenticatedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedTransport")
            .field("config", &self.config)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for AuthenticatedTransport {
    async fn send(&self, mut request: Request) -> Result<Response, reqwest::Error> {
        // A credential that is not a valid header value is left off; the
        // server answers 401 and the caller sees the status.
        if let Some(value) = self.authorization() {
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        self.inner.send(request).await
    }
}
