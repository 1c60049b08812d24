//! Gini API client
//!
//! This module wires authentication, request execution and the document
//! operations together on top of the [`crate::http`] transports.
//!
//! # Architecture
//!
//! - [`auth`] turns a verified configuration into an authenticated transport
//! - [`executor`] builds each request with the canonical headers and races it
//!   against the caller's context
//! - [`client`] and [`document`] implement the operations; every one of
//!   them returns an [`ApiResponse`] envelope
//! - No retries; the poll loop is the only repeated request

pub mod auth;
pub mod client;
pub mod document;
pub mod errors;
pub mod executor;
pub mod query;
pub mod response;

pub use auth::{authenticate, token_client};
pub use client::{ApiClient, ApiClientBuilder, DocumentList};
pub use document::RemoteDocument;
pub use errors::{ApiError, ApiErrorCategory};
pub use executor::{ApiRequest, RequestExecutor};
pub use response::{ApiResponse, Failure, ResponseMeta};
