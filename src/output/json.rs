use crate::article::ArticleRecord;
use crate::Result;
use std::path::Path;

/// Writes the dataset as a pretty-printed JSON array
///
/// Parent directories are created as needed. The file is written in one
/// go once the run has produced every record.
pub fn write_records(path: &Path, records: &[ArticleRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
