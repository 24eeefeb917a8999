//! General-purpose article text extraction
//!
//! Used when none of the known content containers are present. The page is
//! run through Readability main-content detection and rendered as text.

use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};

/// Extracts the main text of an arbitrary article page
///
/// # Arguments
///
/// * `html` - Raw HTML of the article page
///
/// # Returns
///
/// * `Some(text)` - Trimmed body text found by Readability
/// * `None` - Nothing resembling body text was found
pub fn extract_main_text(html: &str) -> Option<String> {
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Text,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: None,
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };

    let text = transform_content_input(input, &config);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
