//! Domain types and models
//!
//! Shapes of the resources exchanged with the API plus the option records
//! callers pass to upload, list and search operations.

pub mod document;
pub mod extractions;
pub mod layout;
pub mod options;

// Re-export for convenience
pub use document::{is_terminal_progress, Document, DocumentSet, Links, Page, Timing};
pub use extractions::{BoundingBox, Extraction, Extractions, Feedback, FeedbackRequest};
pub use layout::{Layout, LayoutPage};
pub use options::{ListOptions, SearchOptions, UploadOptions};
