//! Article data model
//!
//! Previews come out of search result pages; records are the final output
//! unit assembled by the pipeline.

use serde::Serialize;
use std::sync::Arc;

/// One search-result listing entry, before any full-text fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePreview {
    /// Opaque document reference (`data-docref`), empty if absent
    pub article_id: String,

    /// Title with the document-viewer boilerplate removed
    pub title: String,

    /// Relative article URL as found in the listing, empty if absent
    pub url: String,

    /// Raw date string, e.g. "November 29, 2024"
    pub date: String,

    /// Source publication name
    pub source: String,

    /// Author, empty when the listing has none
    pub author: String,
}

/// Location the search was scoped to
///
/// Parsed once per run from the compiled location filter and shared by every
/// record of that run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Final output record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    pub title: String,

    /// ISO-8601 calendar date (`YYYY-MM-DD`)
    pub date: String,

    pub source: String,
    pub author: String,
    pub location: Arc<Location>,

    /// Full article text; empty unless full-text mode is enabled
    pub text: String,

    /// Absolute article URL
    pub url: String,
}

impl ArticleRecord {
    /// Builds a record from a preview plus pipeline-level enrichment
    pub fn from_preview(
        preview: ArticlePreview,
        date: String,
        location: Arc<Location>,
        url: String,
        text: String,
    ) -> Self {
        Self {
            title: preview.title,
            date,
            source: preview.source,
            author: preview.author,
            location,
            text,
            url,
        }
    }
}
