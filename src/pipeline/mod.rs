//! Pipeline orchestrator
//!
//! This module handles:
//! - Page count discovery and limit capping
//! - Concurrent listing and full-text fetches with ordered correlation
//! - Record assembly and run-scoped resource cleanup

mod orchestrator;
mod pagination;

pub use orchestrator::{scrape, Orchestrator, RunSettings};
pub use pagination::{accumulate_listings, total_pages};
