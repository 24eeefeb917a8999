//! Run orchestration: discover, listings, full text, assemble
//!
//! Stages run strictly one after another. Within a stage every fetch is
//! issued concurrently and results are correlated by their original index,
//! so output order never depends on completion order. The first failure in
//! a stage aborts the whole run.

use crate::article::{ArticlePreview, ArticleRecord};
use crate::config::{Config, ScraperConfig};
use crate::extract::{normalize_date, Extractor};
use crate::fetch::{build_http_client, FetchSettings, Fetcher, SessionProvider, StaticSession};
use crate::output::DebugDump;
use crate::pipeline::pagination::{accumulate_listings, total_pages};
use crate::query::{PageTask, SearchQuery};
use crate::worker::WorkerPool;
use crate::{Result, ScrapeError, Stage};
use futures::future::try_join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Run-level knobs taken from the `[scraper]` section
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub fetch: FetchSettings,

    /// Parse worker count; `None` picks the default pool size
    pub workers: Option<usize>,

    pub full_text: bool,

    pub limit: Option<usize>,

    /// Where to dump raw HTML, if anywhere
    pub debug_dir: Option<PathBuf>,

    pub request_timeout: Duration,

    /// Draw per-stage progress bars on stderr
    pub show_progress: bool,
}

impl From<&ScraperConfig> for RunSettings {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            fetch: FetchSettings {
                concurrency: config.concurrency,
                rate_limit: Duration::from_millis(config.rate_limit_ms),
            },
            workers: config.workers,
            full_text: config.full_text,
            limit: config.limit,
            debug_dir: config
                .save_html
                .then(|| PathBuf::from(&config.debug_dir)),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            show_progress: true,
        }
    }
}

/// Drives one scrape run from a compiled query to an ordered dataset
pub struct Orchestrator {
    query: SearchQuery,
    settings: RunSettings,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl Orchestrator {
    /// Creates an orchestrator with an externally supplied session
    pub fn new(config: &Config, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            query: SearchQuery::compile(config),
            settings: RunSettings::from(&config.scraper),
            base_url: config.session.base_url.clone(),
            session,
        }
    }

    /// Creates an orchestrator using the headers and cookies from `[session]`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Arc::new(StaticSession::from_config(&config.session)))
    }

    /// Enables or disables the per-stage progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.settings.show_progress = show;
        self
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Executes the run
    ///
    /// The HTTP session and the worker pool live exactly as long as this
    /// call; the pool is shut down whether the run succeeds or fails.
    ///
    /// # Errors
    ///
    /// Any fetch or extraction failure aborts the run. Both carry the stage
    /// and the page index or article identifier (`Fetch` / `Extract`).
    pub async fn run(&self) -> Result<Vec<ArticleRecord>> {
        let client = build_http_client(self.session.as_ref(), self.settings.request_timeout)?;
        let fetcher = Fetcher::new(client, &self.base_url, self.settings.fetch)?;
        let pool = WorkerPool::new(self.settings.workers);

        let run = Run {
            query: &self.query,
            settings: &self.settings,
            fetcher,
            pool: &pool,
            extractor: Arc::new(Extractor::new()),
            dump: self.settings.debug_dir.clone().map(DebugDump::new),
        };

        let result = run.execute().await;
        pool.shutdown();
        result
    }
}

/// State for a single in-progress run
struct Run<'a> {
    query: &'a SearchQuery,
    settings: &'a RunSettings,
    fetcher: Fetcher,
    pool: &'a WorkerPool,
    extractor: Arc<Extractor>,
    dump: Option<DebugDump>,
}

impl Run<'_> {
    async fn execute(&self) -> Result<Vec<ArticleRecord>> {
        let start_time = Instant::now();

        let pages = self
            .discover()
            .await
            .inspect_err(|e| tracing::error!("{} stage failed: {}", Stage::Discover, e))?;

        tracing::info!("Stage 1: Fetching {} search result pages", pages);
        let listings = self
            .fetch_listings(pages)
            .await
            .inspect_err(|e| tracing::error!("{} stage failed: {}", Stage::Listings, e))?;

        let texts = if self.settings.full_text {
            tracing::info!("Stage 2: Fetching full text for {} articles", listings.len());
            let texts = self
                .fetch_texts(&listings)
                .await
                .inspect_err(|e| tracing::error!("{} stage failed: {}", Stage::FullText, e))?;
            Some(texts)
        } else {
            None
        };

        let records = self
            .assemble(listings, texts)
            .inspect_err(|e| tracing::error!("{} stage failed: {}", Stage::Assemble, e))?;

        tracing::info!(
            "Scrape completed: {} records in {:?}",
            records.len(),
            start_time.elapsed()
        );
        Ok(records)
    }

    /// Fetches page 0 and works out how many pages the run covers
    async fn discover(&self) -> Result<usize> {
        let task = self.query.page_task(0);
        let html = self
            .fetcher
            .fetch_search_page(&task)
            .await
            .map_err(|e| ScrapeError::fetch(Stage::Discover, "page 0", e))?;
        if let Some(dump) = &self.dump {
            dump.save_search_page(task.index, &html).await;
        }

        let total_results = self.extractor.total_results(&html);
        let uncapped = total_pages(total_results, self.query.page_size, None);
        tracing::info!(
            "Found {} results across {} pages",
            total_results,
            uncapped
        );

        let pages = total_pages(total_results, self.query.page_size, self.settings.limit);
        if pages < uncapped {
            tracing::info!("Limiting to first {} pages", pages);
        }
        Ok(pages)
    }

    async fn fetch_listings(&self, pages: usize) -> Result<Vec<ArticlePreview>> {
        let progress = stage_progress(pages, "Fetching search pages", self.settings.show_progress);
        let per_page = try_join_all((0..pages).map(|index| {
            let progress = &progress;
            async move {
                let listings = self.listing_page(self.query.page_task(index)).await;
                progress.inc(1);
                listings
            }
        }))
        .await;
        progress.finish_and_clear();
        let per_page = per_page?;

        let listings = accumulate_listings(per_page, self.settings.limit);
        tracing::info!("Collected {} listings", listings.len());
        Ok(listings)
    }

    async fn listing_page(&self, task: PageTask) -> Result<Vec<ArticlePreview>> {
        let html = self
            .fetcher
            .fetch_search_page(&task)
            .await
            .map_err(|e| ScrapeError::fetch(Stage::Listings, format!("page {}", task.index), e))?;
        if let Some(dump) = &self.dump {
            dump.save_search_page(task.index, &html).await;
        }

        let extractor = Arc::clone(&self.extractor);
        let listings = self
            .pool
            .submit(move || extractor.listings(&html))?
            .join()
            .await?
            .map_err(|e| ScrapeError::extract(Stage::Listings, format!("page {}", task.index), e))?;

        tracing::debug!("Page {}: {} listings", task.index, listings.len());
        Ok(listings)
    }

    async fn fetch_texts(&self, listings: &[ArticlePreview]) -> Result<Vec<String>> {
        let progress = stage_progress(
            listings.len(),
            "Fetching article texts",
            self.settings.show_progress,
        );
        let texts = try_join_all(listings.iter().map(|listing| {
            let progress = &progress;
            async move {
                let text = self.article_text(listing).await;
                progress.inc(1);
                text
            }
        }))
        .await;
        progress.finish_and_clear();
        texts
    }

    async fn article_text(&self, listing: &ArticlePreview) -> Result<String> {
        if listing.url.is_empty() {
            tracing::warn!(
                "Article '{}' has no URL; leaving its text empty",
                listing.article_id
            );
            return Ok(String::new());
        }

        let target = if listing.article_id.is_empty() {
            listing.url.clone()
        } else {
            listing.article_id.clone()
        };

        let html = match self.fetcher.fetch_article(&listing.url).await {
            Ok(html) => html,
            Err(e) => return Err(ScrapeError::fetch(Stage::FullText, target, e)),
        };
        if let Some(dump) = &self.dump {
            dump.save_article(&listing.url, &html).await;
        }

        let extractor = Arc::clone(&self.extractor);
        self.pool
            .submit(move || extractor.article_text(&html))?
            .join()
            .await?
            .map_err(|e| ScrapeError::extract(Stage::FullText, target, e))
    }

    /// Builds the final records in discovery order
    fn assemble(
        &self,
        listings: Vec<ArticlePreview>,
        texts: Option<Vec<String>>,
    ) -> Result<Vec<ArticleRecord>> {
        let location = Arc::new(self.query.location());
        let mut texts = texts.map(Vec::into_iter);

        listings
            .into_iter()
            .map(|preview| -> Result<ArticleRecord> {
                let text = texts.as_mut().and_then(Iterator::next).unwrap_or_default();
                let date = normalize_date(&preview.date).map_err(|e| {
                    ScrapeError::extract(Stage::Assemble, preview.article_id.clone(), e)
                })?;
                let url = self.fetcher.absolute_url(&preview.url)?;

                Ok(ArticleRecord::from_preview(
                    preview,
                    date,
                    Arc::clone(&location),
                    url,
                    text,
                ))
            })
            .collect()
    }
}

/// Progress bar for one stage; hidden when progress is disabled
fn stage_progress(len: usize, label: &'static str, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style.progress_chars("=> "));
    progress.set_message(label);
    progress
}

/// Runs a complete scrape for `config`
///
/// # Example
///
/// ```no_run
/// use newsbank_scraper::config::load_config;
/// use newsbank_scraper::scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("search.toml"))?;
/// let records = scrape(&config).await?;
/// println!("{} articles", records.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(config: &Config) -> Result<Vec<ArticleRecord>> {
    Orchestrator::from_config(config).run().await
}
