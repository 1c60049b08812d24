//! Document resource
//!
//! A [`Document`] mirrors the JSON returned by `GET /documents/{id}`. The
//! `owner` and `timing` fields are client-side bookkeeping and never travel
//! over the wire.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{PROGRESS_COMPLETED, PROGRESS_ERROR};

/// Returns true for the progress values after which polling stops.
pub fn is_terminal_progress(progress: &str) -> bool {
    progress == PROGRESS_COMPLETED || progress == PROGRESS_ERROR
}

/// Client-side timing of an upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timing {
    /// Wall-clock time spent creating the document and fetching it once
    pub upload: Duration,
    /// Wall-clock time spent waiting for server-side processing
    pub processing: Duration,
}

impl Timing {
    /// Upload plus processing.
    pub fn total(&self) -> Duration {
        self.upload + self.processing
    }
}

/// Rendered page images of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub images: HashMap<String, String>,
    #[serde(default)]
    pub page_number: u32,
}

/// Links to a document's sub-resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub document: String,
    pub extractions: String,
    pub layout: String,
    pub processed: String,
}

/// A single uploaded document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(skip)]
    pub timing: Timing,
    /// Acting-user identifier the document was fetched for (may be empty)
    #[serde(skip)]
    pub owner: String,
    #[serde(rename = "_links", default)]
    pub links: Links,
    /// Creation time in milliseconds since the Unix epoch
    #[serde(default)]
    pub creation_date: i64,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Server-defined progress, `PENDING`, `COMPLETED` or `ERROR`
    #[serde(default)]
    pub progress: String,
    #[serde(default)]
    pub source_classification: String,
}

impl Document {
    /// True once processing finished, successfully or not.
    pub fn is_ready(&self) -> bool {
        is_terminal_progress(&self.progress)
    }

    /// Creation time, if the server reported one.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        if self.creation_date == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.creation_date)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Page of documents returned by list and search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSet {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub documents: Vec<Document>,
}
