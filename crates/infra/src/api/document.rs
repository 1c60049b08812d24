//! Document-level operations
//!
//! A [`RemoteDocument`] is a [`Document`] bound to the [`ApiClient`] that
//! fetched it. It dereferences to the plain document, and its operations
//! call back through the client's executor using the document's own links
//! and owner.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use giniapi_common::context::Context;
use giniapi_core::{poll_until_terminal, PollOutcome};
use giniapi_domain::constants::{MEDIA_TYPE_INCUBATOR, MEDIA_TYPE_OCTET_STREAM};
use giniapi_domain::{Document, Extractions, Feedback, FeedbackRequest, Layout};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::client::{body_failure, ApiClient};
use super::errors::ApiError;
use super::executor::{read_bytes, read_json, ApiRequest};
use super::response::{ApiResponse, Failure, ResponseMeta};

pub const DOCUMENT_DELETE_FAILED: &str = "failed to delete document";
pub const DOCUMENT_LAYOUT_FAILED: &str = "failed to get layout";
pub const DOCUMENT_EXTRACTIONS_FAILED: &str = "failed to get extractions";
pub const DOCUMENT_PROCESSED_FAILED: &str = "failed to get processed document";
pub const DOCUMENT_FEEDBACK_FAILED: &str = "failed to submit feedback";
pub const POLLING_ABORTED: &str = "polling aborted";

/// A document bound to the client that fetched it
#[derive(Clone)]
pub struct RemoteDocument {
    client: ApiClient,
    document: Document,
}

impl RemoteDocument {
    pub fn new(client: ApiClient, document: Document) -> Self {
        Self { client, document }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Drop the client binding.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Poll until processing ends, pausing `pause` between fetches.
    ///
    /// On success the document is replaced by the final snapshot, keeping
    /// its upload duration and recording the processing duration. When `ctx`
    /// ends first or a fetch fails the document is left as it was.
    #[instrument(skip(self, ctx), fields(document_id = %self.document.id))]
    pub async fn poll(&mut self, ctx: &Context, pause: Duration) -> ApiResponse<()> {
        let source = Arc::new(self.client.clone());
        match poll_until_terminal(source, ctx, &mut self.document, pause).await {
            PollOutcome::Completed(meta) => ApiResponse::success("polling completed", ())
                .with_meta(meta)
                .with_document_id(self.document.id.clone()),
            PollOutcome::Failed(failure) => {
                failure.with_document_id(self.document.id.clone()).into()
            }
            PollOutcome::Aborted(err) => {
                debug!(reason = %err, "polling aborted");
                ApiResponse::failure(POLLING_ABORTED, ApiError::Aborted(err))
                    .with_document_id(self.document.id.clone())
            }
        }
    }

    /// Re-fetch the document from its own link and replace it in place.
    #[instrument(skip(self, ctx), fields(document_id = %self.document.id))]
    pub async fn update(&mut self, ctx: &Context) -> ApiResponse<()> {
        let url = self.document.links.document.clone();
        match self.client.fetch(ctx, &url, &self.document.owner).await {
            Ok((fresh, meta)) => {
                self.document = fresh;
                ApiResponse::success("update completed", ())
                    .with_meta(meta)
                    .with_document_id(self.document.id.clone())
            }
            Err(failure) => failure.with_document_id(self.document.id.clone()).into(),
        }
    }

    /// Delete the document. Expects `204 No Content`.
    #[instrument(skip(self, ctx), fields(document_id = %self.document.id))]
    pub async fn delete(&self, ctx: &Context) -> ApiResponse<()> {
        let request = self.request(ApiRequest::delete(self.document.links.document.as_str()));
        match self.call(ctx, request, StatusCode::NO_CONTENT, DOCUMENT_DELETE_FAILED).await {
            Ok((_, meta)) => self.completed("delete completed", (), meta),
            Err(failure) => failure.into(),
        }
    }

    /// Layout of the processed document.
    #[instrument(skip(self, ctx), fields(document_id = %self.document.id))]
    pub async fn layout(&self, ctx: &Context) -> ApiResponse<Layout> {
        let request = self.request(ApiRequest::get(self.document.links.layout.as_str()));
        self.get_json(ctx, request, DOCUMENT_LAYOUT_FAILED, "layout completed").await
    }

    /// Extractions of the document.
    ///
    /// With `incubator` set, experimental extractions are requested as well.
    #[instrument(skip(self, ctx), fields(document_id = %self.document.id))]
    pub async fn extractions(&self, ctx: &Context, incubator: bool) -> ApiResponse<Extractions> {
        let mut request = self.request(ApiRequest::get(self.document.links.extractions.as_str()));
        if incubator {
            request = request.header(ACCEPT, HeaderValue::from_static(MEDIA_TYPE_INCUBATOR));
        }
        self.get_json(ctx, request, DOCUMENT_EXTRACTIONS_FAILED, "extractions completed").await
    }

    /// Rectified and optimized rendition of the document as raw bytes.
    #[instrument(skip(self, ctx), fields(document_id = %self.document.id))]
    pub async fn processed(&self, ctx: &Context) -> ApiResponse<Vec<u8>> {
        let request = self
            .request(ApiRequest::get(self.document.links.processed.as_str()))
            .header(ACCEPT, HeaderValue::from_static(MEDIA_TYPE_OCTET_STREAM));
        let (response, meta) =
            match self.call(ctx, request, StatusCode::OK, DOCUMENT_PROCESSED_FAILED).await {
                Ok(received) => received,
                Err(failure) => return failure.into(),
            };

        match read_bytes(ctx, response).await {
            Ok(bytes) => {
                debug!(len = bytes.len(), "processed document received");
                self.completed("processed completed", bytes, meta)
            }
            Err(err) => {
                body_failure(DOCUMENT_PROCESSED_FAILED, err, meta, &self.document.id).into()
            }
        }
    }

    /// Send corrected extraction values back to the API.
    ///
    /// The body is `{"feedback": {<label>: {<field>: <value>}}}`. Expects
    /// `204 No Content`.
    #[instrument(skip_all, fields(document_id = %self.document.id, labels = feedback.len()))]
    pub async fn submit_feedback(&self, ctx: &Context, feedback: &Feedback) -> ApiResponse<()> {
        let request = ApiRequest::put(self.document.links.extractions.as_str())
            .json(&FeedbackRequest { feedback });
        let request = match request {
            Ok(request) => self.request(request),
            Err(err) => {
                return ApiResponse::failure("encoding failed", err)
                    .with_document_id(self.document.id.clone())
            }
        };

        match self.call(ctx, request, StatusCode::NO_CONTENT, DOCUMENT_FEEDBACK_FAILED).await {
            Ok((_, meta)) => self.completed("feedback completed", (), meta),
            Err(failure) => failure.into(),
        }
    }

    fn request(&self, request: ApiRequest) -> ApiRequest {
        request.user_identifier(self.document.owner.as_str())
    }

    async fn call(
        &self,
        ctx: &Context,
        request: ApiRequest,
        expected: StatusCode,
        failure_message: &str,
    ) -> Result<(reqwest::Response, ResponseMeta), Failure> {
        self.client
            .executor()
            .call(ctx, request, expected, failure_message, &self.document.id)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: ApiRequest,
        failure_message: &str,
        success_message: &str,
    ) -> ApiResponse<T> {
        let (response, meta) = match self.call(ctx, request, StatusCode::OK, failure_message).await
        {
            Ok(received) => received,
            Err(failure) => return failure.into(),
        };

        match read_json(ctx, response).await {
            Ok(value) => self.completed(success_message, value, meta),
            Err(err) => body_failure(failure_message, err, meta, &self.document.id).into(),
        }
    }

    fn completed<T>(&self, message: &str, value: T, meta: ResponseMeta) -> ApiResponse<T> {
        ApiResponse::success(message, value)
            .with_meta(meta)
            .with_document_id(self.document.id.clone())
    }
}

impl Deref for RemoteDocument {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.document
    }
}

impl DerefMut for RemoteDocument {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

impl fmt::Display for RemoteDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.document, f)
    }
}

impl fmt::Debug for RemoteDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteDocument").field("document", &self.document).finish_non_exhaustive()
    }
}
