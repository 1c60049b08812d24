//! Response envelope
//!
//! Every public operation returns an [`ApiResponse`]. It always carries a
//! human-readable message and, when a response was received, the raw status,
//! headers and URL. The outcome is either the operation's value or an
//! [`ApiError`], never both.

use giniapi_domain::constants::HEADER_REQUEST_ID;
use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode, Url};

use super::errors::ApiError;

/// Raw metadata of a received HTTP response
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
}

impl ResponseMeta {
    pub fn from_response(response: &Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
        }
    }

    /// Value of the `X-Request-Id` header, if present and readable.
    pub fn request_id(&self) -> Option<String> {
        self.headers
            .get(HEADER_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// Outcome of one API operation
#[derive(Debug)]
#[must_use]
pub struct ApiResponse<T> {
    pub message: String,
    pub document_id: Option<String>,
    pub request_id: Option<String>,
    pub meta: Option<ResponseMeta>,
    outcome: Result<T, ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, value: T) -> Self {
        Self::with_outcome(message, Ok(value))
    }

    pub fn failure(message: impl Into<String>, error: ApiError) -> Self {
        Self::with_outcome(message, Err(error))
    }

    fn with_outcome(message: impl Into<String>, outcome: Result<T, ApiError>) -> Self {
        Self { message: message.into(), document_id: None, request_id: None, meta: None, outcome }
    }

    /// Attach response metadata; lifts the request id from its headers.
    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        if let Some(request_id) = meta.request_id() {
            self.request_id = Some(request_id);
        }
        self.meta = Some(meta);
        self
    }

    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        let document_id = document_id.into();
        if !document_id.is_empty() {
            self.document_id = Some(document_id);
        }
        self
    }

    /// `Some` exactly when the operation did not succeed.
    pub fn error(&self) -> Option<&ApiError> {
        self.outcome.as_ref().err()
    }

    /// `Some` exactly when the operation succeeded.
    pub fn value(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// HTTP status of the received response, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.meta.as_ref().map(|meta| meta.status)
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        self.outcome
    }

    /// Transform the success value, keeping message and metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        let Self { message, document_id, request_id, meta, outcome } = self;
        ApiResponse { message, document_id, request_id, meta, outcome: outcome.map(f) }
    }

    /// Same envelope with the success value swapped for `value`.
    ///
    /// Failures are kept as they are.
    pub fn replace<U>(self, value: U) -> ApiResponse<U> {
        self.map(|_| value)
    }

    /// Separate the value from the envelope, or detach the failure.
    pub fn split(self) -> Result<(T, ApiResponse<()>), Failure> {
        let Self { message, document_id, request_id, meta, outcome } = self;
        match outcome {
            Ok(value) => {
                Ok((value, ApiResponse { message, document_id, request_id, meta, outcome: Ok(()) }))
            }
            Err(error) => Err(Failure { message, document_id, request_id, meta, error }),
        }
    }
}

/// A failed envelope, independent of the value type the operation would
/// have produced
#[derive(Debug)]
pub struct Failure {
    pub message: String,
    pub document_id: Option<String>,
    pub request_id: Option<String>,
    pub meta: Option<ResponseMeta>,
    pub error: ApiError,
}

impl Failure {
    pub fn new(message: impl Into<String>, error: ApiError) -> Self {
        Self { message: message.into(), document_id: None, request_id: None, meta: None, error }
    }

    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        if let Some(request_id) = meta.request_id() {
            self.request_id = Some(request_id);
        }
        self.meta = Some(meta);
        self
    }

    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        let document_id = document_id.into();
        if !document_id.is_empty() {
            self.document_id = Some(document_id);
        }
        self
    }

    pub fn into_response<T>(self) -> ApiResponse<T> {
        let Self { message, document_id, request_id, meta, error } = self;
        ApiResponse { message, document_id, request_id, meta, outcome: Err(error) }
    }
}

impl<T> From<Failure> for ApiResponse<T> {
    fn from(failure: Failure) -> Self {
        failure.into_response()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn meta(request_id: Option<&'static str>) -> ResponseMeta {
        let mut headers = HeaderMap::new();
        if let Some(id) = request_id {
            headers.insert(HEADER_REQUEST_ID, HeaderValue::from_static(id));
        }
        ResponseMeta {
            status: StatusCode::OK,
            headers,
            url: Url::parse("https://api.gini.net/documents/abc").unwrap(),
        }
    }

    #[test]
    fn success_has_value_and_no_error() {
        let response = ApiResponse::success("layout completed", 7).with_meta(meta(Some("req-9")));

        assert!(response.error().is_none());
        assert_eq!(response.value(), Some(&7));
        assert_eq!(response.request_id.as_deref(), Some("req-9"));
        assert_eq!(response.status(), Some(StatusCode::OK));
    }

    #[test]
    fn failure_has_error_and_no_value() {
        let response: ApiResponse<u32> =
            ApiResponse::failure("failed to get layout", ApiError::MissingLocation)
                .with_document_id("abc");

        assert!(response.value().is_none());
        assert!(matches!(response.error(), Some(ApiError::MissingLocation)));
        assert_eq!(response.document_id.as_deref(), Some("abc"));
        assert!(response.meta.is_none());
        assert!(response.into_result().is_err());
    }

    #[test]
    fn missing_request_id_header_leaves_none() {
        let response = ApiResponse::success("ok", ()).with_meta(meta(None));
        assert!(response.request_id.is_none());
    }

    #[test]
    fn empty_document_id_is_ignored() {
        let response = ApiResponse::success("ok", ()).with_document_id("");
        assert!(response.document_id.is_none());
    }

    #[test]
    fn map_and_replace_keep_metadata() {
        let response = ApiResponse::success("ok", 2).with_meta(meta(Some("req-1")));
        let mapped = response.map(|v| v * 10);
        assert_eq!(mapped.value(), Some(&20));
        assert_eq!(mapped.request_id.as_deref(), Some("req-1"));

        let failed: ApiResponse<i32> = ApiResponse::failure("x", ApiError::MissingLocation);
        assert!(failed.replace("y").error().is_some());
    }

    #[test]
    fn split_detaches_value_or_failure() {
        let (value, envelope) =
            ApiResponse::success("ok", 5).with_document_id("doc-1").split().unwrap();
        assert_eq!(value, 5);
        assert_eq!(envelope.document_id.as_deref(), Some("doc-1"));
        assert!(envelope.error().is_none());

        let failure = ApiResponse::<u8>::failure("failed to get layout", ApiError::MissingLocation)
            .with_meta(meta(Some("req-2")))
            .split()
            .unwrap_err();
        assert_eq!(failure.request_id.as_deref(), Some("req-2"));

        let retyped: ApiResponse<String> = failure.into();
        assert_eq!(retyped.message, "failed to get layout");
        assert!(matches!(retyped.error(), Some(ApiError::MissingLocation)));
        assert!(retyped.meta.is_some());
    }
}
