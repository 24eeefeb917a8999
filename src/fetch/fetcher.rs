//! Rate-limited, concurrency-bounded page fetching
//!
//! Every request waits for a slot in the concurrency gate and then sleeps
//! the politeness delay while holding that slot, so the delay throttles how
//! often requests are actually issued rather than just how they queue.

use crate::query::PageTask;
use crate::{Result, ScrapeError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Concurrency and politeness settings for a fetcher
#[derive(Debug, Clone, Copy)]
pub struct FetchSettings {
    /// Maximum simultaneous in-flight requests
    pub concurrency: usize,

    /// Delay before each request is issued
    pub rate_limit: Duration,
}

/// HTTP fetcher shared by every stage of a run
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    gate: Arc<Semaphore>,
    rate_limit: Duration,
    base_url: Url,
    origin: Url,
}

impl Fetcher {
    /// Creates a fetcher for the search endpoint at `base_url`
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client carrying the session headers and cookies
    /// * `base_url` - Search results endpoint; its origin is used to resolve
    ///   article links
    /// * `settings` - Concurrency gate size and politeness delay
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - Ready to issue requests
    /// * `Err(ScrapeError::UrlParse)` - `base_url` is not an absolute URL
    pub fn new(client: Client, base_url: &str, settings: FetchSettings) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        // Scheme and host only; article links resolve against the site root
        let origin = base_url.join("/")?;

        Ok(Self {
            client,
            gate: Arc::new(Semaphore::new(settings.concurrency.max(1))),
            rate_limit: settings.rate_limit,
            base_url,
            origin,
        })
    }

    /// Issues a GET request and returns the response body
    ///
    /// # Errors
    ///
    /// * `Http` - the server answered with a non-success status; no retry
    /// * `Request` - the request could not be sent or the body not read
    pub async fn fetch(&self, url: &str, params: &[(String, String)]) -> Result<String> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| ScrapeError::GateClosed)?;

        tokio::time::sleep(self.rate_limit).await;

        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        tracing::trace!("GET {} ({} params)", url, params.len());
        let response = request.send().await.map_err(|source| ScrapeError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Http {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        response.text().await.map_err(|source| ScrapeError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches one search results page
    pub async fn fetch_search_page(&self, task: &PageTask) -> Result<String> {
        tracing::debug!("Fetching search page {}", task.index);
        self.fetch(self.base_url.as_str(), &task.params).await
    }

    /// Fetches an article page given the URL found in its listing
    ///
    /// # Arguments
    ///
    /// * `article_url` - Listing URL, relative or absolute
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Article page body
    /// * `Err(ScrapeError)` - URL resolution or request failure
    pub async fn fetch_article(&self, article_url: &str) -> Result<String> {
        let url = self.absolute_url(article_url)?;
        self.fetch(&url, &[]).await
    }

    /// Resolves a listing URL against the site origin
    ///
    /// URLs already starting with `http` are returned unchanged and an empty
    /// URL stays empty.
    pub fn absolute_url(&self, relative: &str) -> Result<String> {
        if relative.is_empty() || relative.starts_with("http") {
            return Ok(relative.to_string());
        }
        Ok(self.origin.join(relative)?.to_string())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
