//! Gini API client
//!
//! [`ApiClient`] is the entry point: it verifies the configuration,
//! authenticates once and then issues every request through the same
//! [`RequestExecutor`]. Documents returned by the client are bound to it as
//! [`RemoteDocument`]s so that document-level operations can call back
//! through the same transport.
//!
//! No operation retries. The only repeated request is the poll loop, which
//! is bounded by the caller's [`Context`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use giniapi_common::auth::TokenExchange;
use giniapi_common::context::Context;
use giniapi_core::{DocumentSource, PollState};
use giniapi_domain::{Config, Document, DocumentSet, ListOptions, SearchOptions, UploadOptions};
use reqwest::header::LOCATION;
use reqwest::{Body, StatusCode};
use tokio::time::Instant;
use tracing::{debug, info, instrument};
use url::Url;

use super::auth::{authenticate, token_client};
use super::document::RemoteDocument;
use super::errors::ApiError;
use super::executor::{read_json, ApiRequest, RequestExecutor};
use super::query::{list_url, search_url, upload_url};
use super::response::{ApiResponse, Failure, ResponseMeta};
use crate::http::{HttpTransport, Transport};

pub const UPLOAD_FAILED: &str = "failed to upload document";
pub const DOCUMENT_GET_FAILED: &str = "failed to GET document object";
pub const DOCUMENT_LIST_FAILED: &str = "failed to get document list";
pub const DOCUMENT_SEARCH_FAILED: &str = "failed to complete your search";
pub const DECODING_FAILED: &str = "decoding failed";

/// Failure for a response whose body could not be read or decoded.
pub(crate) fn body_failure(
    message: &str,
    error: ApiError,
    meta: ResponseMeta,
    document_id: &str,
) -> Failure {
    let message = if matches!(error, ApiError::Decode(_)) { DECODING_FAILED } else { message };
    Failure::new(message, error).with_meta(meta).with_document_id(document_id)
}

/// Client for the Gini document API
///
/// Cheap to clone; clones share the authenticated transport.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: Arc<Config>,
    executor: RequestExecutor,
}

/// Documents returned by [`ApiClient::list`] and [`ApiClient::search`]
#[derive(Debug, Clone)]
pub struct DocumentList {
    pub total_count: u64,
    pub documents: Vec<RemoteDocument>,
}

impl ApiClient {
    /// Verify `config`, authenticate and return a ready client.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Config`] when verification fails; nothing is sent
    /// - the token exchange errors of the `OAuth2` strategy
    pub async fn new(config: Config) -> Result<Self, ApiError> {
        Self::builder(config).build().await
    }

    /// Builder for clients with a custom transport or token exchange.
    pub fn builder(config: Config) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub(crate) fn executor(&self) -> &RequestExecutor {
        &self.inner.executor
    }

    fn bind(&self, document: Document) -> RemoteDocument {
        RemoteDocument::new(self.clone(), document)
    }

    /// Upload `body` and fetch the created document.
    ///
    /// The returned document's `timing.upload` covers both the create call
    /// and the initial fetch.
    #[instrument(skip_all, fields(file_name = ?options.file_name))]
    pub async fn upload(
        &self,
        ctx: &Context,
        body: impl Into<Body>,
        options: &UploadOptions,
    ) -> ApiResponse<RemoteDocument> {
        match self.try_upload(ctx, body.into(), options).await {
            Ok((document, meta)) => {
                let id = document.id.clone();
                ApiResponse::success("upload completed", document)
                    .with_meta(meta)
                    .with_document_id(id)
            }
            Err(failure) => failure.into(),
        }
    }

    async fn try_upload(
        &self,
        ctx: &Context,
        body: Body,
        options: &UploadOptions,
    ) -> Result<(RemoteDocument, ResponseMeta), Failure> {
        let started = Instant::now();

        let url = upload_url(self.config(), options)
            .map_err(|err| Failure::new(UPLOAD_FAILED, err))?;
        let request = ApiRequest::post(url.as_str())
            .body(body)
            .user_identifier(options.user_identifier.as_str());
        let (_, meta) =
            self.executor().call(ctx, request, StatusCode::CREATED, UPLOAD_FAILED, "").await?;
        debug!(state = %PollState::Submitted, "document created");

        let Some(location) = resolve_location(&meta) else {
            return Err(Failure::new(UPLOAD_FAILED, ApiError::MissingLocation).with_meta(meta));
        };

        let (mut document, meta) =
            self.fetch(ctx, location.as_str(), &options.user_identifier).await?;
        document.timing.upload = started.elapsed();
        debug!(
            state = %PollState::Fetched,
            document_id = %document.id,
            upload_ms = document.timing.upload.as_millis(),
            "document fetched"
        );

        Ok((self.bind(document), meta))
    }

    /// Fetch the document at `url` on behalf of `owner`.
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &Context, url: &str, owner: &str) -> ApiResponse<RemoteDocument> {
        match self.fetch(ctx, url, owner).await {
            Ok((document, meta)) => {
                let id = document.id.clone();
                ApiResponse::success("get completed", self.bind(document))
                    .with_meta(meta)
                    .with_document_id(id)
            }
            Err(failure) => failure.into(),
        }
    }

    /// Upload `body` and poll the created document until processing ends.
    ///
    /// `ctx` bounds the whole operation, so give it a deadline.
    pub async fn upload_and_wait(
        &self,
        ctx: &Context,
        body: impl Into<Body>,
        options: &UploadOptions,
        pause: Duration,
    ) -> ApiResponse<RemoteDocument> {
        let (mut document, _) = match self.upload(ctx, body, options).await.split() {
            Ok(uploaded) => uploaded,
            Err(failure) => return failure.into(),
        };
        let polled = document.poll(ctx, pause).await;
        polled.replace(document)
    }

    /// One page of the documents visible to `options.user_identifier`.
    #[instrument(skip(self, ctx))]
    pub async fn list(&self, ctx: &Context, options: &ListOptions) -> ApiResponse<DocumentList> {
        let url = match list_url(self.config(), options) {
            Ok(url) => url,
            Err(err) => return ApiResponse::failure(DOCUMENT_LIST_FAILED, err),
        };
        match self.fetch_set(ctx, url, &options.user_identifier, DOCUMENT_LIST_FAILED).await {
            Ok((list, meta)) => ApiResponse::success("list completed", list).with_meta(meta),
            Err(failure) => failure.into(),
        }
    }

    /// Full-text search over the documents visible to
    /// `options.user_identifier`.
    #[instrument(skip(self, ctx))]
    pub async fn search(
        &self,
        ctx: &Context,
        options: &SearchOptions,
    ) -> ApiResponse<DocumentList> {
        let url = match search_url(self.config(), options) {
            Ok(url) => url,
            Err(err) => return ApiResponse::failure(DOCUMENT_SEARCH_FAILED, err),
        };
        match self.fetch_set(ctx, url, &options.user_identifier, DOCUMENT_SEARCH_FAILED).await {
            Ok((list, meta)) => ApiResponse::success("search completed", list).with_meta(meta),
            Err(failure) => failure.into(),
        }
    }

    pub(crate) async fn fetch(
        &self,
        ctx: &Context,
        url: &str,
        owner: &str,
    ) -> Result<(Document, ResponseMeta), Failure> {
        let request = ApiRequest::get(url).user_identifier(owner);
        let (response, meta) =
            self.executor().call(ctx, request, StatusCode::OK, DOCUMENT_GET_FAILED, "").await?;

        let mut document: Document = match read_json(ctx, response).await {
            Ok(document) => document,
            Err(err) => return Err(body_failure(DOCUMENT_GET_FAILED, err, meta, "")),
        };
        if document.id.is_empty() {
            let err = ApiError::Decode("document has no id".to_string());
            return Err(body_failure(DOCUMENT_GET_FAILED, err, meta, ""));
        }

        document.owner = owner.to_string();
        Ok((document, meta))
    }

    async fn fetch_set(
        &self,
        ctx: &Context,
        url: Url,
        owner: &str,
        failure_message: &str,
    ) -> Result<(DocumentList, ResponseMeta), Failure> {
        let request = ApiRequest::get(url.as_str()).user_identifier(owner);
        let (response, meta) =
            self.executor().call(ctx, request, StatusCode::OK, failure_message, "").await?;

        let set: DocumentSet = match read_json(ctx, response).await {
            Ok(set) => set,
            Err(err) => return Err(body_failure(failure_message, err, meta, "")),
        };
        debug!(total = set.total_count, returned = set.documents.len(), "document set received");

        let documents = set
            .documents
            .into_iter()
            .map(|mut document| {
                document.owner = owner.to_string();
                self.bind(document)
            })
            .collect();
        Ok((DocumentList { total_count: set.total_count, documents }, meta))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").field("config", &self.inner.config).finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentSource for ApiClient {
    type Meta = ResponseMeta;
    type Error = Failure;

    async fn fetch_document(
        &self,
        ctx: &Context,
        url: &str,
        owner: &str,
    ) -> Result<(Document, ResponseMeta), Failure> {
        self.fetch(ctx, url, owner).await
    }
}

/// `Location` of a create response, resolved against the request URL.
fn resolve_location(meta: &ResponseMeta) -> Option<Url> {
    let location = meta.headers.get(LOCATION)?.to_str().ok()?;
    if location.is_empty() {
        return None;
    }
    meta.url.join(location).ok()
}

/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
    config: Config,
    transport: Option<Arc<dyn Transport>>,
    token_exchange: Option<Arc<dyn TokenExchange>>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    pub fn new(config: Config) -> Self {
        Self { config, transport: None, token_exchange: None, timeout: None }
    }

    /// Inner transport that the authenticated transport decorates.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Token exchange used by the `OAuth2` strategy.
    pub fn token_exchange(mut self, exchange: Arc<dyn TokenExchange>) -> Self {
        self.token_exchange = Some(exchange);
        self
    }

    /// Per-request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Verify the configuration and authenticate.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub async fn build(self) -> Result<ApiClient, ApiError> {
        let Self { mut config, transport, token_exchange, timeout } = self;
        config.verify()?;
        let config = Arc::new(config);

        let (inner, http): (Arc<dyn Transport>, Option<reqwest::Client>) = match transport {
            Some(transport) => (transport, None),
            None => {
                let mut builder = HttpTransport::builder();
                if let Some(timeout) = timeout {
                    builder = builder.timeout(timeout);
                }
                let transport = builder.build()?;
                let http = transport.client().clone();
                (Arc::new(transport), Some(http))
            }
        };

        let exchange: Arc<dyn TokenExchange> = match token_exchange {
            Some(exchange) => exchange,
            None => {
                let http = match http {
                    Some(http) => http,
                    None => reqwest::Client::builder().build()?,
                };
                Arc::new(token_client(&config, http))
            }
        };

        let response = authenticate(config.clone(), inner, exchange.as_ref()).await;
        let message = response.message.clone();
        let transport = response.into_result()?;
        info!(strategy = %config.authentication, %message, "client ready");

        let executor = RequestExecutor::new(config.clone(), Arc::new(transport));
        Ok(ApiClient { inner: Arc::new(ClientInner { config, executor }) })
    }
}

#[cfg(test)]
mod tests {
    use giniapi_domain::{AuthStrategy, ConfigError};
    use reqwest::header::HeaderMap;

    use super::*;

    fn meta(url: &str, location: Option<&'static str>) -> ResponseMeta {
        let mut headers = HeaderMap::new();
        if let Some(location) = location {
            headers.insert(LOCATION, location.parse().unwrap());
        }
        ResponseMeta { status: StatusCode::CREATED, headers, url: Url::parse(url).unwrap() }
    }

    #[test]
    fn absolute_location_is_kept() {
        let location = "https://api.gini.net/documents/abc";
        let meta = meta("https://api.gini.net/documents", Some(location));
        assert_eq!(resolve_location(&meta).unwrap().as_str(), location);
    }

    #[test]
    fn relative_location_is_joined() {
        let meta = meta("https://api.gini.net/documents?filename=a.pdf", Some("/documents/abc"));
        assert_eq!(resolve_location(&meta).unwrap().as_str(), "https://api.gini.net/documents/abc");
    }

    #[test]
    fn missing_location() {
        assert!(resolve_location(&meta("https://api.gini.net/documents", None)).is_none());
        assert!(resolve_location(&meta("https://api.gini.net/documents", Some(""))).is_none());
    }

    #[test]
    fn decode_errors_get_the_decoding_message() {
        let meta = meta("https://api.gini.net/documents/abc", None);
        let failure =
            body_failure(DOCUMENT_GET_FAILED, ApiError::Decode("eof".into()), meta.clone(), "abc");
        assert_eq!(failure.message, DECODING_FAILED);
        assert_eq!(failure.document_id.as_deref(), Some("abc"));

        let failure = body_failure(DOCUMENT_GET_FAILED, ApiError::MissingLocation, meta, "");
        assert_eq!(failure.message, DOCUMENT_GET_FAILED);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_authentication() {
        let err = ApiClient::new(Config::new("", "secret", AuthStrategy::BasicAuth))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::MissingClientCredentials)));

        let err = ApiClient::new(Config::new("id", "secret", AuthStrategy::OAuth2))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[tokio::test]
    async fn basic_auth_client_needs_no_network() {
        let client = ApiClient::new(Config::new("id", "secret", AuthStrategy::BasicAuth))
            .await
            .unwrap();
        assert_eq!(client.config().api_version, "v1");
        assert!(format!("{client:?}").contains("ApiClient"));
    }
}
