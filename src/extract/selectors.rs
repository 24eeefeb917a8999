//! Ordered selector chains and strategy lists
//!
//! Markup on the target site drifts between versions, so every lookup is a
//! list of candidates tried in order, first match wins.

use scraper::{ElementRef, Html, Selector};

/// A pure extraction strategy over a whole document
pub type Strategy<T> = fn(&Html) -> Option<T>;

/// Runs strategies in order and returns the first one that succeeds
pub fn first_success<T>(document: &Html, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(document))
}

/// CSS selectors tried in priority order
#[derive(Debug)]
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Compiles the candidate selectors, skipping any that fail to parse
    pub fn parse(candidates: &[&str]) -> Self {
        let selectors = candidates
            .iter()
            .filter_map(|css| match Selector::parse(css) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::warn!("Failed to parse selector '{}': {:?}", css, e);
                    None
                }
            })
            .collect();

        Self { selectors }
    }

    /// First element matched by the earliest selector that matches anything
    pub fn first_in<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// Document-level variant of [`SelectorChain::first_in`]
    pub fn first_in_document<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| document.select(selector).next())
    }

    /// All matches of the earliest selector that matches anything
    pub fn all_in_document<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for selector in &self.selectors {
            let found: Vec<ElementRef<'a>> = document.select(selector).collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// All matches of the earliest selector that matches anything within `scope`
    pub fn all_in<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        for selector in &self.selectors {
            let found: Vec<ElementRef<'a>> = scope.select(selector).collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

/// Text content of an element with whitespace runs collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}
