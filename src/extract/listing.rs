use crate::article::ArticlePreview;
use crate::extract::selectors::{element_text, SelectorChain};
use crate::extract::ExtractError;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

/// Boilerplate the site prepends to link text for screen readers
const TITLE_BOILERPLATE: &str = "Go to the document viewer for";

static LISTINGS: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::parse(&["article.search-hits__hit", "div.search-hits__hit"]));

static TITLE: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::parse(&[
        ".search-hits__hit__title a",
        "h3.search-hits__title a",
        r#"a[href*="document-view"]"#,
    ])
});

static DATE: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::parse(&[r#".search-hits__hit__meta__item--display-date, li[class*="date"]"#])
});

static SOURCE: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::parse(&[r#".search-hits__hit__meta__item--source, li[class*="source"]"#])
});

static AUTHOR: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::parse(&[r#".search-hits__hit__meta__item--author, li[class*="author"]"#])
});

static META_ITEMS: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::parse(&[".search-hits__hit__meta li, ul.search-hits__hit__meta li"])
});

static DATE_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+ \d{1,2}, \d{4}$").expect("date shape pattern"));

/// Extracts every listing from a search results page, in document order
///
/// # Errors
///
/// * `NoListingsFound` - neither listing selector matched; the markup is
///   not a recognized results page
/// * `MissingRequiredField` - a listing has no title, date or source
pub fn extract_listings(html: &str) -> Result<Vec<ArticlePreview>, ExtractError> {
    let document = Html::parse_document(html);

    let elements = LISTINGS.all_in_document(&document);
    if elements.is_empty() {
        return Err(ExtractError::NoListingsFound);
    }

    elements.into_iter().map(extract_preview).collect()
}

/// Extracts one listing
fn extract_preview(element: ElementRef<'_>) -> Result<ArticlePreview, ExtractError> {
    let article_id = element.value().attr("data-docref").unwrap_or_default().to_string();

    let title_link = TITLE
        .first_in(element)
        .ok_or_else(|| ExtractError::missing("title", &article_id))?;
    let title = clean_title(&element_text(title_link));
    let url = title_link.value().attr("href").unwrap_or_default().to_string();

    let mut date = DATE.first_in(element);
    let mut source = SOURCE.first_in(element);
    let mut author = AUTHOR.first_in(element);

    // Second pass: classify every metadata item by class or date shape
    if date.is_none() || source.is_none() {
        for item in META_ITEMS.all_in(element) {
            let class = item.value().classes().collect::<Vec<_>>().join(" ");

            if date.is_none() && (class.contains("date") || DATE_SHAPE_RE.is_match(&element_text(item))) {
                date = Some(item);
            } else if source.is_none() && class.contains("source") {
                source = Some(item);
            } else if author.is_none() && class.contains("author") {
                author = Some(item);
            }
        }
    }

    let date = date.ok_or_else(|| ExtractError::missing("date", &article_id))?;
    let source = source.ok_or_else(|| ExtractError::missing("source", &article_id))?;

    Ok(ArticlePreview {
        title,
        url,
        date: element_text(date),
        source: element_text(source),
        author: author.map(element_text).unwrap_or_default(),
        article_id,
    })
}

fn clean_title(raw: &str) -> String {
    raw.replace(TITLE_BOILERPLATE, "").trim().to_string()
}
