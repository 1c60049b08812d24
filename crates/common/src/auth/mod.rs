//! OAuth 2.0 token exchange
//!
//! Covers the two grants the document API accepts:
//!
//! - `authorization_code`: a code obtained out of band is traded for a token
//! - `password`: resource-owner credentials are traded for a token
//!
//! Tokens live in memory only. There is no refresh and no persistence; a
//! client that outlives its token is rebuilt by the caller.
//!
//! # Usage Example
//!
//! ```no_run
//! use giniapi_common::auth::{TokenClient, TokenEndpoint};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoint = TokenEndpoint::new(
//!     "https://user.gini.net/oauth/token",
//!     "client-id",
//!     "client-secret",
//!     vec!["read".to_string()],
//! );
//! let client = TokenClient::new(endpoint, reqwest::Client::new());
//!
//! let tokens = client.password_grant("user@example.com", "password").await?;
//! println!("token expires at {:?}", tokens.expires_at);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod traits;
pub mod types;

pub use client::{TokenClient, TokenExchangeError};
pub use traits::TokenExchange;
pub use types::{OAuthError, TokenEndpoint, TokenResponse, TokenSet};
