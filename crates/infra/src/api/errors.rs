//! API-specific error types
//!
//! Every operation reports failure through one [`ApiError`]. The
//! [`ApiErrorCategory`] groups them for callers that only care about the
//! broad class of failure.

use giniapi_common::auth::TokenExchangeError;
use giniapi_common::context::ContextError;
use giniapi_domain::ConfigError;
use thiserror::Error;

/// Broad classes of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCategory {
    /// Invalid configuration or missing per-call parameters; never sent
    Config,
    /// Token exchange failed or the API answered 401/403
    Authentication,
    /// Rate limiting (429)
    RateLimit,
    /// Other 4xx or an unexpected success status
    Client,
    /// 5xx
    Server,
    /// Response body or headers could not be decoded, or a body could not
    /// be encoded
    Decode,
    /// Request could not be sent
    Network,
    /// Caller's context was cancelled or its deadline passed
    Aborted,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("authorization code exchange failed: {0}")]
    AuthCodeExchange(#[source] TokenExchangeError),

    #[error("credential exchange failed: {0}")]
    CredentialExchange(#[source] TokenExchangeError),

    #[error("missing authentication parameters")]
    MissingAuthParameters,

    /// Response status differs from the single status the operation expects
    #[error("{message} (HTTP status: {status}, RequestID: {}, DocumentID: {})",
        .request_id.as_deref().unwrap_or_default(),
        .document_id.as_deref().unwrap_or_default())]
    Status {
        message: String,
        status: u16,
        request_id: Option<String>,
        document_id: Option<String>,
    },

    #[error("decoding failed: {0}")]
    Decode(String),

    #[error("response carries no usable Location header")]
    MissingLocation,

    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("request aborted: {0}")]
    Aborted(#[from] ContextError),

    #[error("identifier required for this authentication mode")]
    UserIdentifierRequired,

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value for header {name}")]
    InvalidHeader { name: &'static str },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Config(_)
            | Self::MissingAuthParameters
            | Self::UserIdentifierRequired
            | Self::InvalidUrl { .. }
            | Self::InvalidHeader { .. } => ApiErrorCategory::Config,
            Self::AuthCodeExchange(_) | Self::CredentialExchange(_) => {
                ApiErrorCategory::Authentication
            }
            Self::Status { status, .. } => match *status {
                401 | 403 => ApiErrorCategory::Authentication,
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Client,
            },
            Self::Decode(_) | Self::MissingLocation | Self::Encode(_) => ApiErrorCategory::Decode,
            Self::Aborted(_) => ApiErrorCategory::Aborted,
            Self::Transport(_) => ApiErrorCategory::Network,
        }
    }

    /// HTTP status for status mismatches.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Context error behind an aborted call.
    pub fn context_error(&self) -> Option<ContextError> {
        match self {
            Self::Aborted(err) => Some(*err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            message: "failed to GET document object".into(),
            status: code,
            request_id: Some("req-1".into()),
            document_id: None,
        }
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::from(ConfigError::MissingClientCredentials).category(),
            ApiErrorCategory::Config
        );
        assert_eq!(ApiError::UserIdentifierRequired.category(), ApiErrorCategory::Config);
        assert_eq!(status(401).category(), ApiErrorCategory::Authentication);
        assert_eq!(status(404).category(), ApiErrorCategory::Client);
        assert_eq!(status(429).category(), ApiErrorCategory::RateLimit);
        assert_eq!(status(503).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::Decode("eof".into()).category(), ApiErrorCategory::Decode);
        assert_eq!(
            ApiError::from(ContextError::DeadlineExceeded).category(),
            ApiErrorCategory::Aborted
        );
    }

    #[test]
    fn test_status_display_carries_ids() {
        assert_eq!(
            status(404).to_string(),
            "failed to GET document object (HTTP status: 404, RequestID: req-1, DocumentID: )"
        );
        assert_eq!(status(404).status(), Some(404));
        assert_eq!(ApiError::MissingLocation.status(), None);
    }

    #[test]
    fn test_identifier_message() {
        assert_eq!(
            ApiError::UserIdentifierRequired.to_string(),
            "identifier required for this authentication mode"
        );
        assert_eq!(
            ApiError::from(ContextError::Cancelled).context_error(),
            Some(ContextError::Cancelled)
        );
    }
}
