use crate::extract::selectors::{element_text, first_success, SelectorChain, Strategy};
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Multiplier applied to the visible listing count when the page has no
/// total-hits summary. Deliberately approximate: assumes more pages exist.
pub const ASSUMED_PAGES_WHEN_UNCOUNTED: usize = 5;

static TOTAL_HITS: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::parse(&[".search-hits__meta--total_hits, .search-hitsmeta--total_hits"])
});

static VISIBLE_HITS: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::parse(&["article.search-hits__hit, .search-hits__hit"]));

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("count pattern"));

/// Extracts the total number of search results from a results page
///
/// Reads the thousands-separated count from the summary element. Without
/// one, counts the visible listings and multiplies by
/// [`ASSUMED_PAGES_WHEN_UNCOUNTED`]. A page with neither reports zero.
pub fn extract_total_results(html: &str) -> usize {
    let document = Html::parse_document(html);
    total_results_in(&document)
}

pub(crate) fn total_results_in(document: &Html) -> usize {
    const STRATEGIES: &[Strategy<usize>] = &[from_summary, from_visible_listings];
    first_success(document, STRATEGIES).unwrap_or(0)
}

fn from_summary(document: &Html) -> Option<usize> {
    let summary = TOTAL_HITS.first_in_document(document)?;
    let text = element_text(summary);
    let digits = COUNT_RE.find(&text)?.as_str().replace(',', "");
    digits.parse().ok()
}

fn from_visible_listings(document: &Html) -> Option<usize> {
    let visible = VISIBLE_HITS.all_in_document(document).len();
    (visible > 0).then(|| visible * ASSUMED_PAGES_WHEN_UNCOUNTED)
}
