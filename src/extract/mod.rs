//! Extraction engine
//!
//! This module turns raw HTML into structured data:
//! - Total result count from a search results page
//! - Article previews from a search results page
//! - Body text from an article page
//! - Listing date normalization
//!
//! Each lookup runs an ordered chain of selectors or strategies and takes
//! the first that succeeds, so known markup variants are handled without a
//! schema. Unrecognized markup is a hard error, never an empty result.

mod cache;
mod count;
mod date;
mod listing;
mod readability;
mod selectors;
mod text;

pub use cache::ParseCache;
pub use count::{extract_total_results, ASSUMED_PAGES_WHEN_UNCOUNTED};
pub use date::normalize_date;
pub use listing::extract_listings;
pub use readability::extract_main_text;
pub use selectors::{element_text, first_success, SelectorChain, Strategy};
pub use text::extract_article_text;

use crate::article::ArticlePreview;
use thiserror::Error;

/// Entries kept per parse cache
const CACHE_CAPACITY: usize = 100;

/// Hard extraction failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no listing elements found; page markup not recognized")]
    NoListingsFound,

    #[error("missing required field `{field}` for article '{article_id}'")]
    MissingRequiredField {
        field: &'static str,
        article_id: String,
    },

    #[error("could not extract article text with any strategy")]
    TextExtractionFailed,

    #[error("unrecognized date format: {0:?}")]
    DateFormat(String),
}

impl ExtractError {
    pub(crate) fn missing(field: &'static str, article_id: &str) -> Self {
        Self::MissingRequiredField {
            field,
            article_id: article_id.to_string(),
        }
    }
}

/// Extraction entry points with memoized results
///
/// Shared across parse workers behind an `Arc`.
#[derive(Debug)]
pub struct Extractor {
    listings: ParseCache<Vec<ArticlePreview>>,
    texts: ParseCache<String>,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            listings: ParseCache::new(CACHE_CAPACITY),
            texts: ParseCache::new(CACHE_CAPACITY),
        }
    }

    /// Total result count; cheap enough to run inline
    pub fn total_results(&self, html: &str) -> usize {
        extract_total_results(html)
    }

    /// Article previews on a search results page
    ///
    /// # Arguments
    ///
    /// * `html` - Raw search results page
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ArticlePreview>)` - Listings in document order; reused when
    ///   the same page was parsed before
    /// * `Err(ExtractError)` - Unrecognized markup or a missing required field
    pub fn listings(&self, html: &str) -> Result<Vec<ArticlePreview>, ExtractError> {
        self.listings
            .get_or_try_insert_with(html, || extract_listings(html))
    }

    /// Body text of an article page, memoized like [`Extractor::listings`]
    pub fn article_text(&self, html: &str) -> Result<String, ExtractError> {
        self.texts
            .get_or_try_insert_with(html, || extract_article_text(html))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_reuses_listing_results() {
        let html = r#"
            <article class="search-hits__hit" data-docref="r1">
                <h3 class="search-hits__hit__title"><a href="/doc/r1">Repeat</a></h3>
                <ul class="search-hits__hit__meta">
                    <li class="search-hits__hit__meta__item--display-date">May 1, 2024</li>
                    <li class="search-hits__hit__meta__item--source">Post</li>
                </ul>
            </article>"#;

        let extractor = Extractor::new();
        let first = extractor.listings(html).unwrap();
        let second = extractor.listings(html).unwrap();
        assert_eq!(first, second);
        assert_eq!(extractor.listings.len(), 1);
    }

    #[test]
    fn test_extractor_propagates_failures() {
        let extractor = Extractor::new();
        assert_eq!(
            extractor.listings("<p>nothing</p>"),
            Err(ExtractError::NoListingsFound)
        );
        assert_eq!(
            extractor.article_text("<b>x</b>"),
            Err(ExtractError::TextExtractionFailed)
        );
    }

    #[test]
    fn test_error_messages_name_the_article() {
        let err = ExtractError::missing("date", "news/42");
        assert_eq!(
            err.to_string(),
            "missing required field `date` for article 'news/42'"
        );
    }
}
