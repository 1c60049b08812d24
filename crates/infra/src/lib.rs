//! # Gini API Infrastructure
//!
//! HTTP-backed implementation of the Gini API client.
//!
//! This crate contains:
//! - Request transports and the credential-injecting decorator
//! - Authentication strategies, request execution and the API operations
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Implements the `DocumentSource` port defined in `giniapi-core`
//! - Depends on `giniapi-domain`, `giniapi-common` and `giniapi-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod api;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, ApiResponse, DocumentList,
    RemoteDocument, ResponseMeta,
};
pub use http::{AuthenticatedTransport, Credential, HttpTransport, HttpTransportBuilder, Transport};
