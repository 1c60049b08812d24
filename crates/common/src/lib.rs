//! Shared building blocks for the giniapi crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: plain types and errors
//! - `runtime`: cancellable request [`context`] (tokio, tokio-util)
//! - `platform`: OAuth 2.0 token exchange ([`auth`], reqwest)
//! - `observability`: tracing (pulled in by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod context;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

#[cfg(feature = "platform")]
pub use auth::{TokenClient, TokenEndpoint, TokenExchange, TokenExchangeError, TokenSet};
#[cfg(feature = "runtime")]
pub use context::{Context, ContextError};
