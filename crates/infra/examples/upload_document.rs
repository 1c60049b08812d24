//! Example: Upload a document and print its extractions
//!
//! Reads the client configuration from the environment (`GINI_CLIENT_ID`,
//! `GINI_CLIENT_SECRET`, ...) or a `gini.toml` / `gini.json` file, uploads
//! the given file and waits up to two minutes for processing.
//!
//! ```bash
//! RUST_LOG=giniapi_infra=debug cargo run -p giniapi-infra --example upload_document -- invoice.pdf
//! ```
//!
//! Under basic auth set `GINI_USER_IDENTIFIER` as well.

use std::time::Duration;

use anyhow::{bail, Context as _};
use giniapi_common::context::Context;
use giniapi_domain::constants::DEFAULT_POLL_INTERVAL_MS;
use giniapi_domain::UploadOptions;
use giniapi_infra::{config, ApiClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let Some(file) = std::env::args().nth(1) else {
        bail!("usage: upload_document <file>");
    };
    let body = std::fs::read(&file).with_context(|| format!("failed to read {file}"))?;

    let client = ApiClient::new(config::load()?).await?;

    let options = UploadOptions {
        file_name: Some(file.clone()),
        doc_type_hint: None,
        user_identifier: std::env::var("GINI_USER_IDENTIFIER").unwrap_or_default(),
    };
    let ctx = Context::background().with_timeout(Duration::from_secs(120));
    let pause = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);

    let response = client.upload_and_wait(&ctx, body, &options, pause).await;
    tracing::info!(
        message = %response.message,
        request_id = ?response.request_id,
        "upload finished"
    );
    let document = response.into_result()?;

    tracing::info!(
        document_id = %document,
        progress = %document.progress,
        upload_ms = document.timing.upload.as_millis(),
        processing_ms = document.timing.processing.as_millis(),
        "document processed"
    );

    let extractions = document.extractions(&ctx, false).await.into_result()?;
    for (label, extraction) in &extractions.extractions {
        tracing::info!(
            %label,
            entity = %extraction.entity,
            value = %extraction.value,
            "extraction"
        );
    }

    Ok(())
}
