//! HTTP transports

pub mod client;
pub mod transport;

pub use client::{HttpTransport, HttpTransportBuilder};
pub use transport::{AuthenticatedTransport, Credential, Transport};
