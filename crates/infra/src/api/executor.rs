//! Request construction and execution
//!
//! [`RequestExecutor`] turns an [`ApiRequest`] into one HTTP call with the
//! canonical header set:
//!
//! - `Accept: application/vnd.gini.<version>+json` unless the request sets
//!   its own `Accept`
//! - `User-Agent: gini-api-rust/<version>`
//! - `X-User-Identifier` under basic auth, where it is mandatory
//!
//! The call is raced against the caller's [`Context`]. Status codes are not
//! inspected here; see [`expect_status`].

use std::sync::Arc;

use giniapi_common::context::Context;
use giniapi_domain::constants::{user_agent, versioned_media_type, HEADER_USER_IDENTIFIER};
use giniapi_domain::Config;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Body, Method, Request, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::errors::ApiError;
use super::response::{Failure, ResponseMeta};
use crate::http::Transport;

/// One request against the resource API
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Body>,
    user_identifier: String,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            user_identifier: String::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Extra header, appended after the canonical ones.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// JSON body with a matching `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(value)?;
        Ok(self.header(CONTENT_TYPE, HeaderValue::from_static("application/json")).body(bytes))
    }

    /// Acting-user identifier, mandatory under basic auth.
    #[must_use]
    pub fn user_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.user_identifier = identifier.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Issues requests through the authenticated transport
#[derive(Clone)]
pub struct RequestExecutor {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(config: Arc<Config>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the final request: canonical headers, identifier, extras.
    ///
    /// # Errors
    ///
    /// - [`ApiError::UserIdentifierRequired`] under basic auth without an
    ///   identifier
    /// - [`ApiError::InvalidUrl`] / [`ApiError::InvalidHeader`] for values
    ///   that cannot go on the wire
    pub fn build(&self, request: ApiRequest) -> Result<Request, ApiError> {
        let ApiRequest { method, url, headers: extra, body, user_identifier } = request;

        let url = Url::parse(&url)
            .map_err(|err| ApiError::InvalidUrl { url: url.clone(), reason: err.to_string() })?;

        let mut headers = HeaderMap::new();
        if !extra.contains_key(ACCEPT) {
            let accept = HeaderValue::from_str(&versioned_media_type(&self.config.api_version))
                .map_err(|_| ApiError::InvalidHeader { name: "Accept" })?;
            headers.insert(ACCEPT, accept);
        }
        let agent = HeaderValue::from_str(&user_agent())
            .map_err(|_| ApiError::InvalidHeader { name: "User-Agent" })?;
        headers.insert(USER_AGENT, agent);

        if self.config.authentication.requires_user_identifier() {
            if user_identifier.is_empty() {
                return Err(ApiError::UserIdentifierRequired);
            }
            let value = HeaderValue::from_str(&user_identifier)
                .map_err(|_| ApiError::InvalidHeader { name: HEADER_USER_IDENTIFIER })?;
            headers.insert(HEADER_USER_IDENTIFIER, value);
        }

        for (name, value) in &extra {
            headers.append(name.clone(), value.clone());
        }

        let mut built = Request::new(method, url);
        *built.headers_mut() = headers;
        *built.body_mut() = body;
        Ok(built)
    }

    /// Send `request`, aborting when `ctx` ends first.
    ///
    /// # Errors
    ///
    /// Everything [`RequestExecutor::build`] reports, plus
    /// [`ApiError::Aborted`] and [`ApiError::Transport`].
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, ctx: &Context, request: ApiRequest) -> Result<Response, ApiError> {
        if let Some(err) = ctx.err() {
            return Err(ApiError::Aborted(err));
        }

        let request = self.build(request)?;

        match ctx.run(self.transport.send(request)).await {
            Ok(Ok(response)) => {
                debug!(status = %response.status(), "response received");
                Ok(response)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "request failed");
                Err(ApiError::Transport(err))
            }
            Err(err) => {
                debug!(reason = %err, "request aborted");
                Err(ApiError::Aborted(err))
            }
        }
    }

    /// Execute and check the status in one step.
    ///
    /// Requests that never produced a response are reported as
    /// `failed to complete <METHOD> request`; status mismatches under
    /// `failure_message`.
    pub async fn call(
        &self,
        ctx: &Context,
        request: ApiRequest,
        expected: StatusCode,
        failure_message: &str,
        document_id: &str,
    ) -> Result<(Response, ResponseMeta), Failure> {
        let method = request.method.clone();
        let response = self.execute(ctx, request).await.map_err(|err| {
            Failure::new(request_failed(&method), err).with_document_id(document_id)
        })?;
        expect_status(response, expected, failure_message, document_id)
    }
}

/// Envelope message for a request that never produced a response.
pub fn request_failed(method: &Method) -> String {
    format!("failed to complete {method} request")
}

/// Compare against the single expected status.
///
/// # Errors
///
/// Returns an [`ApiError::Status`] failure carrying status and request id.
pub fn expect_status(
    response: Response,
    expected: StatusCode,
    failure_message: &str,
    document_id: &str,
) -> Result<(Response, ResponseMeta), Failure> {
    let meta = ResponseMeta::from_response(&response);
    if response.status() == expected {
        return Ok((response, meta));
    }

    warn!(
        expected = expected.as_u16(),
        status = meta.status.as_u16(),
        url = %meta.url,
        "unexpected response status"
    );
    let error = ApiError::Status {
        message: failure_message.to_string(),
        status: meta.status.as_u16(),
        request_id: meta.request_id(),
        document_id: (!document_id.is_empty()).then(|| document_id.to_string()),
    };
    Err(Failure::new(failure_message, error).with_meta(meta).with_document_id(document_id))
}

/// Read the full body, aborting when `ctx` ends first.
///
/// # Errors
///
/// Returns [`ApiError::Aborted`] or [`ApiError::Transport`].
pub async fn read_bytes(ctx: &Context, response: Response) -> Result<Vec<u8>, ApiError> {
    let bytes = ctx.run(response.bytes()).await??;
    Ok(bytes.to_vec())
}

/// Read and decode a JSON body.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] for malformed bodies, plus whatever
/// [`read_bytes`] reports.
pub async fn read_json<T: DeserializeOwned>(
    ctx: &Context,
    response: Response,
) -> Result<T, ApiError> {
    let bytes = read_bytes(ctx, response).await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use giniapi_domain::AuthStrategy;

    use super::*;
    use crate::http::HttpTransport;

    fn executor(strategy: AuthStrategy) -> RequestExecutor {
        let mut config = Config::new("id", "secret", strategy).with_auth_code("code");
        config.apply_defaults();
        RequestExecutor::new(Arc::new(config), Arc::new(HttpTransport::new().unwrap()))
    }

    #[test]
    fn canonical_headers_are_set() {
        let request = executor(AuthStrategy::OAuth2)
            .build(ApiRequest::get("https://api.gini.net/documents/abc"))
            .unwrap();

        assert_eq!(request.headers()[ACCEPT], "application/vnd.gini.v1+json");
        assert!(request.headers()[USER_AGENT].to_str().unwrap().starts_with("gini-api-rust/"));
        assert!(request.headers().get(HEADER_USER_IDENTIFIER).is_none());
    }

    #[test]
    fn caller_accept_wins() {
        let request = executor(AuthStrategy::OAuth2)
            .build(
                ApiRequest::get("https://api.gini.net/documents/abc/processed")
                    .header(ACCEPT, HeaderValue::from_static("application/octet-stream")),
            )
            .unwrap();

        let accepts: Vec<_> = request.headers().get_all(ACCEPT).iter().collect();
        assert_eq!(accepts, vec!["application/octet-stream"]);
    }

    #[test]
    fn identifier_ignored_under_oauth2() {
        let request = executor(AuthStrategy::OAuth2)
            .build(ApiRequest::get("https://api.gini.net/documents").user_identifier("user-1"))
            .unwrap();

        assert!(request.headers().get(HEADER_USER_IDENTIFIER).is_none());
    }

    #[test]
    fn basic_auth_requires_identifier() {
        let executor = executor(AuthStrategy::BasicAuth);

        let err = executor.build(ApiRequest::get("https://api.gini.net/documents")).unwrap_err();
        assert!(matches!(err, ApiError::UserIdentifierRequired));

        let request = executor
            .build(ApiRequest::get("https://api.gini.net/documents").user_identifier("user-1"))
            .unwrap();
        assert_eq!(request.headers()[HEADER_USER_IDENTIFIER], "user-1");
    }

    #[test]
    fn invalid_url_is_reported() {
        let err = executor(AuthStrategy::OAuth2).build(ApiRequest::get("not a url")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn ended_context_sends_nothing() {
        let ctx = Context::background();
        ctx.cancel();

        let err = executor(AuthStrategy::OAuth2)
            .execute(&ctx, ApiRequest::get("http://127.0.0.1:9/documents"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Aborted(_)));
    }
}
