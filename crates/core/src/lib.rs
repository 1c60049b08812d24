//! # Gini API Core
//!
//! Transport-independent client logic.
//!
//! This crate contains:
//! - The [`DocumentSource`] port used to re-fetch documents
//! - The upload poll loop and its [`PollState`] machine
//!
//! ## Architecture Principles
//! - Depends on `giniapi-domain` and `giniapi-common` only
//! - No HTTP code; fetching goes through the port
//! - Cancellation flows through [`giniapi_common::context::Context`]

pub mod document;

pub use document::{poll_until_terminal, DocumentSource, PollOutcome, PollState};
