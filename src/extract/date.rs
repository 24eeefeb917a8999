use crate::extract::ExtractError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Full month name, one space, 1-2 digit day, comma, one space, 4-digit year
static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(january|february|march|april|may|june|july|august|september|october|november|december) \d{1,2}, \d{4}$",
    )
    .expect("month-day-year pattern")
});

/// Converts a listing date like "November 29, 2024" into `2024-11-29`
///
/// Only the `Month D, YYYY` shape is accepted; there is no fuzzy parsing.
///
/// # Examples
///
/// ```
/// use newsbank_scraper::extract::normalize_date;
///
/// assert_eq!(normalize_date("November 29, 2024").unwrap(), "2024-11-29");
/// assert!(normalize_date("29 Nov 2024").is_err());
/// ```
pub fn normalize_date(raw: &str) -> Result<String, ExtractError> {
    let trimmed = raw.trim();
    // chrono alone also takes abbreviated months and loose spacing
    if !MONTH_DAY_YEAR.is_match(trimmed) {
        return Err(ExtractError::DateFormat(raw.to_string()));
    }

    NaiveDate::parse_from_str(trimmed, "%B %d, %Y")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| ExtractError::DateFormat(raw.to_string()))
}
