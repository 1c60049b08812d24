//! API constants
//!
//! Centralized location for the wire-level constants shared by the client
//! layers: progress values, header names and media types.

// Document processing progress
pub const PROGRESS_PENDING: &str = "PENDING";
pub const PROGRESS_COMPLETED: &str = "COMPLETED";
pub const PROGRESS_ERROR: &str = "ERROR";

// Headers
pub const HEADER_USER_IDENTIFIER: &str = "X-User-Identifier";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";

// Media types
pub const MEDIA_TYPE_OCTET_STREAM: &str = "application/octet-stream";
pub const MEDIA_TYPE_INCUBATOR: &str = "application/vnd.gini.incubator+json";

/// Library version reported in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default pause between two polls of a document's progress.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Versioned content-negotiation media type, e.g. `application/vnd.gini.v1+json`.
pub fn versioned_media_type(api_version: &str) -> String {
    format!("application/vnd.gini.{api_version}+json")
}

/// `User-Agent` value sent with every request.
pub fn user_agent() -> String {
    format!("gini-api-rust/{VERSION}")
}
