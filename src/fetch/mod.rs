//! Fetch engine
//!
//! This module handles all HTTP traffic for a run:
//! - Session headers and cookies from an external provider
//! - A shared concurrency gate with a politeness delay per request
//! - Resolution of relative article URLs against the site origin
//!
//! Failed requests are not retried. A non-success status surfaces as
//! `ScrapeError::Http` and aborts the stage that issued it.

mod fetcher;
mod session;

pub use fetcher::{FetchSettings, Fetcher};
pub use session::{build_http_client, SessionProvider, StaticSession};
