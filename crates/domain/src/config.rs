//! Client configuration
//!
//! [`Config`] carries the credentials and endpoints for one API client. It is
//! plain data: [`Config::verify`] fills unset fields from [`DEFAULTS`] and
//! checks the credential invariants before any network call is attempted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};
use crate::impl_wire_name_conversions;

/// Authentication strategy selected at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AuthStrategy {
    /// Token exchange: an authorization code or username/password pair is
    /// exchanged once for a bearer access token.
    #[default]
    #[serde(rename = "oauth2")]
    OAuth2,

    /// Static credential: every request carries a basic-auth header built
    /// from the client id and secret plus an acting-user identifier.
    #[serde(rename = "basicAuth", alias = "basic_auth")]
    BasicAuth,
}

impl_wire_name_conversions!(AuthStrategy {
    OAuth2 => "oauth2",
    BasicAuth => "basicAuth",
});

impl AuthStrategy {
    /// Whether requests under this strategy must name an acting user.
    pub fn requires_user_identifier(self) -> bool {
        matches!(self, Self::BasicAuth)
    }
}

/// Immutable record of process-wide default values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub api_version: &'static str,
    pub api_endpoint: &'static str,
    pub user_center_endpoint: &'static str,
    pub authentication: AuthStrategy,
}

/// Defaults applied by [`Config::verify`].
pub const DEFAULTS: Defaults = Defaults {
    api_version: "v1",
    api_endpoint: "https://api.gini.net",
    user_center_endpoint: "https://user.gini.net",
    authentication: AuthStrategy::OAuth2,
};

/// Remote endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Resource API base URL
    pub api: String,
    /// Identity / token issuer base URL
    pub user_center: String,
}

/// Client configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing)]
    pub auth_code: Option<String>,
    pub scopes: Vec<String>,
    pub endpoints: Endpoints,
    pub api_version: String,
    pub authentication: AuthStrategy,
}

impl Config {
    /// Create a configuration with the given client credentials and strategy.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        authentication: AuthStrategy,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authentication,
            ..Self::default()
        }
    }

    /// Set username and password for the password grant.
    #[must_use]
    pub fn with_user_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set a pre-obtained authorization code.
    #[must_use]
    pub fn with_auth_code(mut self, code: impl Into<String>) -> Self {
        self.auth_code = Some(code.into());
        self
    }

    /// Point both endpoints somewhere else.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        api: impl Into<String>,
        user_center: impl Into<String>,
    ) -> Self {
        self.endpoints = Endpoints { api: api.into(), user_center: user_center.into() };
        self
    }

    /// Apply defaults and validate the credential invariants.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingClientCredentials`] when client id or secret
    ///   is empty
    /// - [`ConfigError::MissingAuthParameters`] when the `OAuth2` strategy
    ///   has neither an authorization code nor a username/password pair
    pub fn verify(&mut self) -> ConfigResult<()> {
        self.apply_defaults();

        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ConfigError::MissingClientCredentials);
        }

        if self.authentication == AuthStrategy::OAuth2
            && self.auth_code().is_none()
            && self.user_credentials().is_none()
        {
            return Err(ConfigError::MissingAuthParameters);
        }

        Ok(())
    }

    /// Fill empty fields from [`DEFAULTS`].
    pub fn apply_defaults(&mut self) {
        if self.api_version.is_empty() {
            self.api_version = DEFAULTS.api_version.to_string();
        }
        if self.endpoints.api.is_empty() {
            self.endpoints.api = DEFAULTS.api_endpoint.to_string();
        }
        if self.endpoints.user_center.is_empty() {
            self.endpoints.user_center = DEFAULTS.user_center_endpoint.to_string();
        }
    }

    /// Authorization code, if a non-empty one is configured.
    pub fn auth_code(&self) -> Option<&str> {
        non_empty(self.auth_code.as_deref())
    }

    /// Username and password, if both are configured and non-empty.
    pub fn user_credentials(&self) -> Option<(&str, &str)> {
        Some((non_empty(self.username.as_deref())?, non_empty(self.password.as_deref())?))
    }

    /// Token endpoint of the identity service.
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.endpoints.user_center.trim_end_matches('/'))
    }

    /// Resource API URL for `path` (leading slash optional).
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.api.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const REDACTED: &str = "<redacted>";
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("auth_code", &self.auth_code.as_ref().map(|_| REDACTED))
            .field("scopes", &self.scopes)
            .field("endpoints", &self.endpoints)
            .field("api_version", &self.api_version)
            .field("authentication", &self.authentication)
            .finish()
    }
}
