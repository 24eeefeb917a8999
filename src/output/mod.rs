//! Output module
//!
//! This module handles:
//! - Writing the final dataset as JSON
//! - Dumping raw HTML for debugging when enabled

mod debug;
mod json;

pub use debug::{article_file_name, DebugDump};
pub use json::write_records;
