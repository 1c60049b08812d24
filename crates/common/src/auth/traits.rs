//! Seam for token exchange
//!
//! Lets the authentication layer be tested against a scripted exchanger
//! instead of a live identity service.

use async_trait::async_trait;

use super::client::TokenExchangeError;
use super::types::TokenSet;

/// Grant-for-token exchange against an identity service
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchange an authorization code (`grant_type=authorization_code`).
    ///
    /// # Errors
    /// Returns error if the request fails or the service rejects the code
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, TokenExchangeError>;

    /// Exchange resource-owner credentials (`grant_type=password`).
    ///
    /// # Errors
    /// Returns error if the request fails or the service rejects the
    /// credentials
    async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenSet, TokenExchangeError>;
}
