//! Configuration module
//!
//! This module handles loading, parsing, and validating run configuration
//! files. The search record (location, date range, query, page size) sits at
//! the top level; `[scraper]` and `[session]` tables tune the run.
//!
//! # Example
//!
//! ```no_run
//! use newsbank_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("search.toml")).unwrap();
//! println!("Concurrency: {}", config.scraper.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DateRangeConfig, LocationConfig, ScraperConfig, SearchConfig, SessionConfig,
    DEFAULT_BASE_URL, DEFAULT_HEADERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_scraper_config};
