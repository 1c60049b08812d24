//! Error types raised before any network activity takes place

use thiserror::Error;

/// Configuration errors
///
/// Returned by [`Config::verify`](crate::Config::verify) and by the
/// configuration loaders. None of these involve the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("client id and client secret are required")]
    MissingClientCredentials,

    #[error("missing authentication parameters: an authorization code or username and password are required")]
    MissingAuthParameters,

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// Result type alias for configuration handling
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
