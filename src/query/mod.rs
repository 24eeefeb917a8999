//! Query compiler
//!
//! This module turns the user-facing search record into the flat parameter
//! set the search endpoint expects:
//! - Boolean query tokenization and term/field pairing
//! - The slash-delimited location filter
//! - Date range, duplicate hiding and page size parameters
//! - Per-page pagination parameters
//!
//! Compilation never fails. Missing dates, an empty query or an empty field
//! list simply drop the corresponding clauses.

mod location;
mod tokenizer;

pub use location::{build_location_filter, parse_location_filter};
pub use tokenizer::{tokenize_query, BoolOp, QueryToken};

use crate::article::Location;
use crate::config::Config;

/// Parameters every search carries
const STANDARD_PARAMS: &[(&str, &str)] = &[("sort", "YMD_date:D"), ("p", "WORLDNEWS"), ("f", "advanced")];

const LOCATION_KEY: &str = "t";
const DATE_FIELD_KEY: &str = "fld-nav-0";
const DATE_VALUE_KEY: &str = "val-nav-0";
const DATE_FIELD: &str = "YMD_date";
const PAGE_SIZE_KEY: &str = "maxresults";

/// A boolean-query term bound to the field it searches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTerm {
    pub term: String,
    pub field: String,
    pub operator: BoolOp,
}

/// Compiled search: everything needed to request any result page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub hide_duplicates: bool,

    /// Location filter (`t` parameter)
    pub location_filter: String,

    /// `(start, end)` when both bounds are present
    pub date_range: Option<(String, String)>,

    /// Terms paired positionally with fields
    pub terms: Vec<QueryTerm>,

    /// Results per page
    pub page_size: u32,
}

/// One unit of pagination work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTask {
    /// 0-based page index
    pub index: usize,

    /// Fully resolved request parameters for this page
    pub params: Vec<(String, String)>,
}

impl SearchQuery {
    /// Compiles a search configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use newsbank_scraper::config::load_config;
    /// use newsbank_scraper::query::SearchQuery;
    /// use std::path::Path;
    ///
    /// let config = load_config(Path::new("search.toml")).unwrap();
    /// let query = SearchQuery::compile(&config);
    /// for (key, value) in query.params() {
    ///     println!("{key}={value}");
    /// }
    /// ```
    pub fn compile(config: &Config) -> Self {
        let start = config.date_range.start.trim();
        let end = config.date_range.end.trim();
        let date_range = if !start.is_empty() && !end.is_empty() {
            Some((start.to_string(), end.to_string()))
        } else {
            None
        };

        let terms = pair_terms(&config.search.query, &config.search.fields);
        if terms.is_empty() && !config.search.query.trim().is_empty() {
            tracing::warn!("Search query given without fields; query clause omitted");
        }

        Self {
            hide_duplicates: config.hide_duplicates,
            location_filter: build_location_filter(&config.location),
            date_range,
            terms,
            page_size: config.max_results_per_page,
        }
    }

    /// Emits the full parameter mapping, in a stable order
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = STANDARD_PARAMS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let hide = if self.hide_duplicates { "2" } else { "0" };
        params.push(("hide_duplicates".to_string(), hide.to_string()));

        if !self.location_filter.is_empty() {
            params.push((LOCATION_KEY.to_string(), self.location_filter.clone()));
        }

        if let Some((start, end)) = &self.date_range {
            params.push((DATE_FIELD_KEY.to_string(), DATE_FIELD.to_string()));
            params.push((DATE_VALUE_KEY.to_string(), format!("{} - {}", start, end)));
        }

        for (i, term) in self.terms.iter().enumerate() {
            params.push((format!("val-base-{}", i), term.term.clone()));
            params.push((format!("fld-base-{}", i), term.field.clone()));
            // The first term is the query root and carries no operator
            if i > 0 {
                params.push((format!("bln-base-{}", i), term.operator.as_param().to_string()));
            }
        }

        params.push((PAGE_SIZE_KEY.to_string(), self.page_size.to_string()));

        params
    }

    /// Builds the request for one result page
    ///
    /// Pages after the first add `page` and `offset` parameters.
    pub fn page_task(&self, index: usize) -> PageTask {
        let mut params = self.params();

        if index > 0 {
            let offset = index as u64 * u64::from(self.page_size);
            params.push(("page".to_string(), index.to_string()));
            params.push(("offset".to_string(), offset.to_string()));
        }

        PageTask { index, params }
    }

    /// Parses the run-scoped location back out of the location filter
    pub fn location(&self) -> Location {
        parse_location_filter(&self.location_filter)
    }
}

/// Pairs query terms with field names by position
///
/// When the lists differ in length only `min(terms, fields)` pairs are
/// produced; the excess on either side is dropped.
pub fn pair_terms(query: &str, fields: &str) -> Vec<QueryTerm> {
    if query.trim().is_empty() || fields.trim().is_empty() {
        return Vec::new();
    }

    let tokens = tokenize_query(query);
    let fields: Vec<&str> = fields.split_whitespace().collect();

    if tokens.len() != fields.len() {
        tracing::warn!(
            "Query has {} terms but {} fields; using the first {}",
            tokens.len(),
            fields.len(),
            tokens.len().min(fields.len())
        );
    }

    tokens
        .into_iter()
        .zip(fields)
        .map(|(token, field)| QueryTerm {
            term: token.value,
            field: field.to_string(),
            operator: token.operator,
        })
        .collect()
}
