//! # Gini API Domain
//!
//! Data types shared by every layer of the Gini API client.
//!
//! This crate contains:
//! - Client configuration and the immutable defaults record
//! - Document, extraction and layout models as returned by the API
//! - Request option records for upload, listing and search
//! - Domain error types
//!
//! ## Architecture
//! - No dependencies on other giniapi crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod macros;
pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
