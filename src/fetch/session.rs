//! Session state and HTTP client construction
//!
//! Credentials are an external concern: the scraper only asks a
//! [`SessionProvider`] for headers and cookies when the client is built and
//! never renews them.

use crate::config::SessionConfig;
use crate::ScrapeError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::Client;
use std::time::Duration;

/// Source of the headers and cookies attached to every request
pub trait SessionProvider: Send + Sync {
    /// Header name/value pairs
    fn headers(&self) -> Vec<(String, String)>;

    /// Cookie name/value pairs
    fn cookies(&self) -> Vec<(String, String)>;
}

/// Session supplied up front, typically from the config file
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
}

impl StaticSession {
    pub fn new(headers: Vec<(String, String)>, cookies: Vec<(String, String)>) -> Self {
        Self { headers, cookies }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            headers: config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            cookies: config
                .cookies
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl SessionProvider for StaticSession {
    fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }

    fn cookies(&self) -> Vec<(String, String)> {
        self.cookies.clone()
    }
}

/// Builds the run's HTTP client with the session baked into default headers
///
/// Invalid header names or values are skipped with a warning rather than
/// failing the run.
///
/// # Example
///
/// ```no_run
/// use newsbank_scraper::fetch::{build_http_client, StaticSession};
/// use std::time::Duration;
///
/// let session = StaticSession::new(
///     vec![("accept".to_string(), "text/html".to_string())],
///     vec![("session".to_string(), "token".to_string())],
/// );
/// let client = build_http_client(&session, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    session: &dyn SessionProvider,
    timeout: Duration,
) -> Result<Client, ScrapeError> {
    let mut headers = HeaderMap::new();

    for (name, value) in session.headers() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!("Skipping invalid session header '{}'", name),
        }
    }

    if let Some(cookie) = cookie_header(&session.cookies()) {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(_) => tracing::warn!("Session cookies contain invalid characters; not sent"),
        }
    }

    let client = Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Joins cookies into a single `Cookie` header value
fn cookie_header(cookies: &[(String, String)]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }

    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
