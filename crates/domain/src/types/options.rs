//! Option records for upload, list and search

use serde::{Deserialize, Serialize};

/// Upload options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// File name reported to the API
    pub file_name: Option<String>,
    /// Document type hint (e.g. `Invoice`)
    pub doc_type_hint: Option<String>,
    /// Acting-user identifier, mandatory under basic auth
    pub user_identifier: String,
}

/// Options for listing documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    pub limit: u32,
    pub offset: u32,
    pub user_identifier: String,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { limit: 20, offset: 0, user_identifier: String::new() }
    }
}

/// Options for a full-text document search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub query: String,
    pub doc_type: Option<String>,
    pub limit: u32,
    pub offset: u32,
    pub user_identifier: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            doc_type: None,
            limit: 20,
            offset: 0,
            user_identifier: String::new(),
        }
    }
}

impl SearchOptions {
    /// Search for `query` with default paging.
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }
}
