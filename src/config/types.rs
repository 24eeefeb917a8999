use serde::Deserialize;
use std::collections::BTreeMap;

/// Search endpoint the scraper targets unless the config overrides it
pub const DEFAULT_BASE_URL: &str = "https://infoweb.newsbank.com/apps/news/results";

/// Browser-like headers sent with every request
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.9"),
    ("cache-control", "no-cache"),
    ("pragma", "no-cache"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("upgrade-insecure-requests", "1"),
];

/// Main configuration structure
///
/// The search fields live at the top level so a flat JSON search record
/// loads unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub hide_duplicates: bool,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub date_range: DateRangeConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default = "default_page_size")]
    pub max_results_per_page: u32,

    #[serde(default)]
    pub scraper: ScraperConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hide_duplicates: default_true(),
            location: LocationConfig::default(),
            date_range: DateRangeConfig::default(),
            search: SearchConfig::default(),
            max_results_per_page: default_page_size(),
            scraper: ScraperConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Location filter inputs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
}

/// Inclusive date range, ISO date strings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeConfig {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// Boolean query and the whitespace-delimited field list it searches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub fields: String,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Delay applied before every request (milliseconds)
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    /// Maximum number of in-flight requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Parse worker count; half the available CPUs when unset
    #[serde(default)]
    pub workers: Option<usize>,

    /// Fetch each article page and extract its body text
    #[serde(default)]
    pub full_text: bool,

    /// Maximum number of records to produce
    #[serde(default)]
    pub limit: Option<usize>,

    /// Dump fetched HTML to `debug_dir`
    #[serde(default)]
    pub save_html: bool,

    #[serde(default = "default_debug_dir")]
    pub debug_dir: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: default_rate_limit_ms(),
            concurrency: default_concurrency(),
            workers: None,
            full_text: false,
            limit: None,
            save_html: false,
            debug_dir: default_debug_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Session state handed to the HTTP client
///
/// Cookies are opaque and supplied externally; they are assumed valid for
/// the whole run.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            headers: default_headers(),
            cookies: BTreeMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> u32 {
    60
}

fn default_rate_limit_ms() -> u64 {
    300
}

fn default_concurrency() -> usize {
    10
}

fn default_debug_dir() -> String {
    ".".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_headers() -> BTreeMap<String, String> {
    DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
