//! NewsBank scraper: a staged, polite extractor for paginated search results
//!
//! This crate compiles a search configuration into site query parameters,
//! fetches result pages and article pages under a concurrency gate and a
//! politeness delay, parses the HTML on a dedicated worker pool, and emits an
//! ordered dataset of article records.

pub mod article;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod query;
pub mod worker;

use std::fmt;
use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Request gate closed")]
    GateClosed,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("{stage} stage failed fetching {target}: {source}")]
    Fetch {
        stage: Stage,
        target: String,
        source: Box<ScrapeError>,
    },

    #[error("{stage} stage failed on {target}: {source}")]
    Extract {
        stage: Stage,
        target: String,
        source: extract::ExtractError,
    },

    #[error("Worker pool error: {0}")]
    Worker(#[from] worker::PoolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Wraps a fetch failure with the stage and target it happened on
    pub fn fetch(stage: Stage, target: impl Into<String>, source: ScrapeError) -> Self {
        Self::Fetch {
            stage,
            target: target.into(),
            source: Box::new(source),
        }
    }


    /// Wraps an extraction failure with the stage and target it happened on
    pub fn extract(stage: Stage, target: impl Into<String>, source: extract::ExtractError) -> Self {
        Self::Extract {
            stage,
            target: target.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Pipeline stage, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discover,
    Listings,
    FullText,
    Assemble,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discover => "discover",
            Stage::Listings => "listings",
            Stage::FullText => "full-text",
            Stage::Assemble => "assemble",
        };
        f.write_str(name)
    }
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use article::{ArticlePreview, ArticleRecord, Location};
pub use config::Config;
pub use pipeline::{scrape, Orchestrator};
pub use query::SearchQuery;
