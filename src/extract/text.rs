use crate::extract::readability::extract_main_text;
use crate::extract::selectors::{first_success, SelectorChain, Strategy};
use crate::extract::ExtractError;
use scraper::Html;
use std::sync::LazyLock;

static CONTENT: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::parse(&[".document-view__body", ".document-body", ".article-body"])
});

/// Extracts the body text of an article page
///
/// Known content containers are tried first; their trimmed text is returned
/// as-is. Otherwise Readability main-content extraction is applied to the
/// whole page.
///
/// # Arguments
///
/// * `html` - Raw HTML of the article page
///
/// # Errors
///
/// * `TextExtractionFailed` - no container matched and Readability found
///   nothing
pub fn extract_article_text(html: &str) -> Result<String, ExtractError> {
    const STRATEGIES: &[Strategy<String>] = &[from_content_container];

    let document = Html::parse_document(html);
    first_success(&document, STRATEGIES)
        .or_else(|| extract_main_text(html))
        .ok_or(ExtractError::TextExtractionFailed)
}

fn from_content_container(document: &Html) -> Option<String> {
    CONTENT
        .first_in_document(document)
        .map(|container| container.text().collect::<String>().trim().to_string())
}
