//! Token endpoint client
//!
//! Posts form-encoded grants to the identity service with the client
//! credentials as HTTP basic auth. One exchange per call; no refresh and no
//! retry.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::traits::TokenExchange;
use super::types::{OAuthError, TokenEndpoint, TokenResponse, TokenSet};

/// Error type for token exchange
#[derive(Error, Debug)]
pub enum TokenExchangeError {
    /// Request could not be sent or the connection failed
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Identity service rejected the grant
    #[error("token exchange rejected ({status}): {error}")]
    OAuth { status: u16, error: OAuthError },

    /// Non-success status without an OAuth error body
    #[error("token endpoint returned status {0}")]
    Status(u16),

    /// Success status but the body is not a token response
    #[error("invalid token response: {0}")]
    Parse(String),
}

/// Token endpoint client
#[derive(Debug, Clone)]
pub struct TokenClient {
    endpoint: TokenEndpoint,
    http: Client,
}

impl TokenClient {
    /// Create a client that exchanges grants at `endpoint` using `http`.
    ///
    /// # Examples
    /// ```
    /// use giniapi_common::auth::{TokenClient, TokenEndpoint};
    ///
    /// let endpoint = TokenEndpoint::new(
    ///     "https://user.gini.net/oauth/token",
    ///     "client-id",
    ///     "client-secret",
    ///     vec![],
    /// );
    /// let client = TokenClient::new(endpoint, reqwest::Client::new());
    /// assert_eq!(client.endpoint().client_id, "client-id");
    /// ```
    #[must_use]
    pub fn new(endpoint: TokenEndpoint, http: Client) -> Self {
        Self { endpoint, http }
    }

    #[must_use]
    pub fn endpoint(&self) -> &TokenEndpoint {
        &self.endpoint
    }

    /// Exchange an authorization code for a token.
    ///
    /// # Errors
    /// See [`TokenExchangeError`].
    #[instrument(skip_all, fields(token_url = %self.endpoint.token_url))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, TokenExchangeError> {
        let params = [("grant_type", "authorization_code"), ("code", code)];
        self.request_token(&params).await
    }

    /// Exchange username and password for a token.
    ///
    /// Configured scopes are sent as `scope`.
    ///
    /// # Errors
    /// See [`TokenExchangeError`].
    #[instrument(skip_all, fields(token_url = %self.endpoint.token_url))]
    pub async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenSet, TokenExchangeError> {
        let scope = self.endpoint.scope_string();
        let mut params =
            vec![("grant_type", "password"), ("username", username), ("password", password)];
        if let Some(scope) = scope.as_deref() {
            params.push(("scope", scope));
        }
        self.request_token(&params).await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenSet, TokenExchangeError> {
        let response = self
            .http
            .post(&self.endpoint.token_url)
            .basic_auth(&self.endpoint.client_id, Some(self.endpoint.client_secret()))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<OAuthError>(&body) {
                Ok(error) => {
                    warn!(
                        status = status.as_u16(),
                        error = %error.error,
                        "token exchange rejected"
                    );
                    Err(TokenExchangeError::OAuth { status: status.as_u16(), error })
                }
                Err(_) => {
                    warn!(status = status.as_u16(), "token endpoint returned unexpected status");
                    Err(TokenExchangeError::Status(status.as_u16()))
                }
            };
        }

        let token: TokenResponse =
            response.json().await.map_err(|e| TokenExchangeError::Parse(e.to_string()))?;
        let tokens = TokenSet::from(token);
        debug!(expires_at = ?tokens.expires_at, "token exchange succeeded");
        Ok(tokens)
    }
}

#[async_trait]
impl TokenExchange for TokenClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, TokenExchangeError> {
        self.exchange_code(code).await
    }

    async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenSet, TokenExchangeError> {
        self.password_grant(username, password).await
    }
}
