//! Token endpoint types
//!
//! Request-side configuration ([`TokenEndpoint`]) plus the RFC 6749 response
//! shapes returned by the identity service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Where and as whom to exchange grants for tokens
#[derive(Clone)]
pub struct TokenEndpoint {
    /// Absolute token URL, e.g. `https://user.gini.net/oauth/token`
    pub token_url: String,
    pub client_id: String,
    client_secret: String,
    /// Scopes sent with the password grant (space-joined)
    pub scopes: Vec<String>,
}

impl TokenEndpoint {
    #[must_use]
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes,
        }
    }

    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Scopes as a space-separated string, `None` when no scope is configured.
    #[must_use]
    pub fn scope_string(&self) -> Option<String> {
        let scopes: Vec<&str> =
            self.scopes.iter().map(String::as_str).filter(|s| !s.is_empty()).collect();
        if scopes.is_empty() {
            None
        } else {
            Some(scopes.join(" "))
        }
    }
}

impl fmt::Debug for TokenEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEndpoint")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Access token obtained from a single exchange
///
/// Held in memory for the lifetime of the client; never refreshed.
#[derive(Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub token_type: String,
    /// Absolute expiry computed from `expires_in` at exchange time
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token response from the identity service
///
/// Only `access_token` is mandatory; the service omits `token_type` on some
/// grants. A `refresh_token`, if sent, is ignored.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        let expires_at = response
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Utc::now() + chrono::Duration::seconds(secs));

        Self {
            access_token: response.access_token,
            token_type: response.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at,
            scope: response.scope,
        }
    }
}

/// OAuth error body (RFC 6749 section 5.2)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
