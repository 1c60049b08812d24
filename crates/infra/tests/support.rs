//! Shared fixtures for the API integration tests
//!
//! Clients are built against a wiremock server with proxies disabled so
//! that no request leaves the machine.

use std::sync::Arc;

use giniapi_domain::{AuthStrategy, Config};
use giniapi_infra::api::token_client;
use giniapi_infra::{ApiClient, HttpTransport, Transport};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
/// base64("client-id:client-secret")
pub const BASIC_AUTHORIZATION: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";
pub const USER: &str = "user-1";

pub fn config(server: &MockServer, strategy: AuthStrategy) -> Config {
    Config::new(CLIENT_ID, CLIENT_SECRET, strategy).with_endpoints(server.uri(), server.uri())
}

pub fn transport() -> Arc<dyn Transport> {
    Arc::new(HttpTransport::builder().no_proxy().build().expect("transport should build"))
}

/// Client using basic auth; building it makes no request.
pub async fn basic_client(server: &MockServer) -> ApiClient {
    ApiClient::builder(config(server, AuthStrategy::BasicAuth))
        .transport(transport())
        .build()
        .await
        .expect("basic auth client should build")
}

/// Client using the OAuth2 code grant; the token endpoint must be mounted.
pub async fn oauth_client(server: &MockServer) -> ApiClient {
    let config = config(server, AuthStrategy::OAuth2).with_auth_code("the-code");
    let http = reqwest::Client::builder().no_proxy().build().expect("reqwest client should build");
    let exchange = Arc::new(token_client(&config, http));
    ApiClient::builder(config)
        .transport(transport())
        .token_exchange(exchange)
        .build()
        .await
        .expect("oauth2 client should build")
}

pub fn document_url(server: &MockServer, id: &str) -> String {
    format!("{}/documents/{id}", server.uri())
}

/// Document body as served by the API, with links pointing at `server`.
pub fn document_json(server: &MockServer, id: &str, progress: &str) -> Value {
    let base = document_url(server, id);
    json!({
        "id": id,
        "creationDate": 1_360_623_867_402_i64,
        "name": "invoice.pdf",
        "origin": "UPLOAD",
        "pageCount": 1,
        "pages": [],
        "progress": progress,
        "sourceClassification": "NATIVE",
        "_links": {
            "document": base,
            "extractions": format!("{base}/extractions"),
            "layout": format!("{base}/layout"),
            "processed": format!("{base}/processed"),
        }
    })
}
