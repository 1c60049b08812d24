//! Port interfaces for document retrieval
//!
//! The poll loop only needs to re-fetch a document by URL. The HTTP-backed
//! implementation lives in `giniapi-infra`.

use async_trait::async_trait;
use giniapi_common::context::Context;
use giniapi_domain::Document;

/// Trait for fetching a single document by its resource URL
#[async_trait]
pub trait DocumentSource: Send + Sync + 'static {
    /// Response metadata handed back alongside a fetched document
    type Meta: Send + 'static;

    /// Failure reported by a fetch
    type Error: Send + 'static;

    /// Fetch the document at `url` on behalf of `owner`.
    ///
    /// Implementations honour `ctx` for the in-flight request and stamp
    /// `owner` into the returned document.
    async fn fetch_document(
        &self,
        ctx: &Context,
        url: &str,
        owner: &str,
    ) -> Result<(Document, Self::Meta), Self::Error>;
}
