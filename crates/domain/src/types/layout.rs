//! Document layout
//!
//! Only the page frame is typed. Zones, lines and words are kept as raw JSON
//! so that schema additions on the server side never break decoding.

use serde::{Deserialize, Serialize};

/// Layout of a processed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub meta: serde_json::Value,
    pub pages: Vec<LayoutPage>,
}

/// Layout of a single page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutPage {
    pub number: u32,
    pub size_x: f64,
    pub size_y: f64,
    pub text_zones: Vec<serde_json::Value>,
    pub regions: Vec<serde_json::Value>,
}
