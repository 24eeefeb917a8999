use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("unsafe filename pattern"));

/// Dumps raw HTML bodies for offline inspection
///
/// Purely diagnostic: write failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct DebugDump {
    dir: PathBuf,
}

impl DebugDump {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves a search results page as `debug_response_page{index}.html`
    pub async fn save_search_page(&self, index: usize, html: &str) {
        let path = self.dir.join(format!("debug_response_page{}.html", index));
        self.write(&path, html).await;
    }

    /// Saves an article page as `debug_article_{docref}.html`
    pub async fn save_article(&self, article_url: &str, html: &str) {
        let path = self.dir.join(article_file_name(article_url));
        self.write(&path, html).await;
    }

    async fn write(&self, path: &Path, html: &str) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!("Failed to create debug dir {}: {}", self.dir.display(), e);
            return;
        }
        match tokio::fs::write(path, html).await {
            Ok(()) => tracing::debug!("Saved HTML to {}", path.display()),
            Err(e) => tracing::warn!("Failed to save HTML to {}: {}", path.display(), e),
        }
    }
}

/// File name for an article dump, derived from its `docref` parameter
pub fn article_file_name(article_url: &str) -> String {
    let docref = article_url
        .split_once("docref=")
        .map(|(_, rest)| rest.split('&').next().unwrap_or_default())
        .unwrap_or("unknown");

    format!("debug_article_{}.html", UNSAFE_CHARS.replace_all(docref, "_"))
}
