//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to serve search result pages and article pages
//! and run the whole pipeline end-to-end.

use newsbank_scraper::config::Config;
use newsbank_scraper::extract::ExtractError;
use newsbank_scraper::{ArticleRecord, Orchestrator, ScrapeError, Stage};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PATH: &str = "/apps/news/results";
const ARTICLE_PATH: &str = "/apps/news/document-view";

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.location.country = "USA".to_string();
    config.location.state = "TX".to_string();
    config.location.city = "Austin".to_string();
    config.date_range.start = "2024-01-01".to_string();
    config.date_range.end = "2024-12-31".to_string();
    config.search.query = "flood AND levee".to_string();
    config.search.fields = "alltext alltext".to_string();
    config.scraper.rate_limit_ms = 0;
    config.scraper.workers = Some(2);
    config.session.base_url = format!("{}{}", server.uri(), RESULTS_PATH);
    config
}

/// Runs the pipeline with progress bars off
async fn run_scrape(config: &Config) -> Result<Vec<ArticleRecord>, ScrapeError> {
    Orchestrator::from_config(config).with_progress(false).run().await
}

/// Renders one listing with a document-view link
fn listing(id: usize) -> String {
    listing_dated(id, &format!("May {}, 2024", id % 28 + 1))
}

fn listing_dated(id: usize, date: &str) -> String {
    format!(
        r#"<article class="search-hits__hit" data-docref="news/{id}">
            <h3 class="search-hits__hit__title">
                <a href="{ARTICLE_PATH}?p=WORLDNEWS&docref=news/{id}">Go to the document viewer for Story {id}</a>
            </h3>
            <ul class="search-hits__hit__meta">
                <li class="search-hits__hit__meta__item--display-date">{date}</li>
                <li class="search-hits__hit__meta__item--source">Austin Chronicle</li>
                <li class="search-hits__hit__meta__item--author">Reporter {id}</li>
            </ul>
        </article>"#
    )
}

/// Renders a results page holding listings `ids`
fn results_page(total: Option<usize>, ids: std::ops::Range<usize>) -> String {
    let summary = total
        .map(|t| format!(r#"<div class="search-hits__meta--total_hits">{} Results</div>"#, t))
        .unwrap_or_default();
    let listings: String = ids.map(listing).collect();
    format!("<html><body>{summary}<section>{listings}</section></body></html>")
}

fn article_page(id: usize) -> String {
    format!(
        r#"<html><body><div class="document-view__body">
            Full text of story {id}.
        </div></body></html>"#
    )
}

/// Mounts a two-page result set: 90 results, 60 then 30 listings
async fn mount_two_pages(server: &MockServer) {
    // Page-specific mocks go first so they take precedence over page 0
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "1"))
        .and(query_param("offset", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(Some(90), 60..90)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(Some(90), 0..60)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_pages_without_full_text() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let config = create_test_config(&server);
    let records = run_scrape(&config).await.expect("scrape should succeed");

    assert_eq!(records.len(), 90);
    assert!(records.iter().all(|r| r.text.is_empty()));

    // Discovery order: page 0 then page 1, document order within each
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.title, format!("Story {}", i));
    }

    let first = &records[0];
    assert_eq!(first.date, "2024-05-01");
    assert_eq!(first.source, "Austin Chronicle");
    assert_eq!(first.author, "Reporter 0");
    assert_eq!(
        first.url,
        format!("{}{}?p=WORLDNEWS&docref=news/0", server.uri(), ARTICLE_PATH)
    );
    assert_eq!(first.location.city, "Austin");
    assert_eq!(first.location.state, "TX");
    assert_eq!(first.location.country, "USA");
}

#[tokio::test]
async fn test_search_parameters_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("val-base-0", "flood"))
        .and(query_param("fld-base-0", "alltext"))
        .and(query_param("val-base-1", "levee"))
        .and(query_param("bln-base-1", "and"))
        .and(query_param("val-nav-0", "2024-01-01 - 2024-12-31"))
        .and(query_param("hide_duplicates", "2"))
        .and(query_param("maxresults", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(Some(2), 0..2)))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let records = run_scrape(&config).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_limit_caps_pages_and_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(Some(90), 60..90)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(Some(90), 0..60)))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.scraper.limit = Some(5);

    let records = run_scrape(&config).await.unwrap();

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Story 0", "Story 1", "Story 2", "Story 3", "Story 4"]);
}

#[tokio::test]
async fn test_full_text_is_correlated_by_index() {
    let server = MockServer::start().await;

    for id in 0..3 {
        // Later articles answer faster so completion order is reversed
        let delay = std::time::Duration::from_millis(90 - 30 * id as u64);
        Mock::given(method("GET"))
            .and(path(ARTICLE_PATH))
            .and(query_param("docref", format!("news/{}", id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(article_page(id))
                    .set_delay(delay),
            )
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(Some(3), 0..3)))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.scraper.full_text = true;

    let records = run_scrape(&config).await.unwrap();

    assert_eq!(records.len(), 3);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.title, format!("Story {}", i));
        assert_eq!(record.text, format!("Full text of story {}.", i));
    }
}

#[tokio::test]
async fn test_http_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(Some(90), 0..60)))
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    match run_scrape(&config).await {
        Err(ScrapeError::Fetch { stage, target, source }) => {
            assert_eq!(stage, Stage::Listings);
            assert_eq!(target, "page 1");
            match *source {
                ScrapeError::Http { status, url } => {
                    assert_eq!(status, 500);
                    assert!(url.contains("page=1"));
                }
                other => panic!("expected HTTP error, got {other:?}"),
            }
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_discover_failure_names_stage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    match run_scrape(&config).await {
        Err(ScrapeError::Fetch { stage, target, source }) => {
            assert_eq!(stage, Stage::Discover);
            assert_eq!(target, "page 0");
            assert!(matches!(*source, ScrapeError::Http { status: 403, .. }));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

/// Mounts one results page of `count` listings and full-text mode config
async fn full_text_setup(server: &MockServer, count: usize) -> Config {
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(results_page(Some(count), 0..count)),
        )
        .mount(server)
        .await;

    let mut config = create_test_config(server);
    config.scraper.full_text = true;
    config
}

#[tokio::test]
async fn test_article_http_failure_aborts_full_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLE_PATH))
        .and(query_param("docref", "news/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ARTICLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_page(0)))
        .mount(&server)
        .await;
    let config = full_text_setup(&server, 2).await;

    match run_scrape(&config).await {
        Err(ScrapeError::Fetch { stage, target, source }) => {
            assert_eq!(stage, Stage::FullText);
            assert_eq!(target, "news/1");
            assert!(matches!(*source, ScrapeError::Http { status: 500, .. }));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_article_without_text_aborts_full_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLE_PATH))
        .and(query_param("docref", "news/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ARTICLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_page(0)))
        .mount(&server)
        .await;
    let config = full_text_setup(&server, 2).await;

    match run_scrape(&config).await {
        Err(ScrapeError::Extract { stage, target, source }) => {
            assert_eq!(stage, Stage::FullText);
            assert_eq!(target, "news/1");
            assert_eq!(source, ExtractError::TextExtractionFailed);
        }
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparsable_listing_date_fails_assembly() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<html><body><div class="search-hits__meta--total_hits">2 Results</div>{}{}</body></html>"#,
        listing(0),
        listing_dated(1, "Nov 29, 2024"),
    );
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    match run_scrape(&config).await {
        Err(ScrapeError::Extract { stage, target, source }) => {
            assert_eq!(stage, Stage::Assemble);
            assert_eq!(target, "news/1");
            assert_eq!(source, ExtractError::DateFormat("Nov 29, 2024".to_string()));
        }
        other => panic!("expected extraction error, got {other:?}"),
    }
}

/// Mounts pages 1..pages as `body(index)`, then an uncounted page 0 with two listings
async fn mount_uncounted(server: &MockServer, pages: usize, body: impl Fn(usize) -> String) {
    for index in 1..pages {
        Mock::given(method("GET"))
            .and(path(RESULTS_PATH))
            .and(query_param("page", index.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(body(index)))
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(None, 0..2)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_uncounted_results_assume_five_pages() {
    let server = MockServer::start().await;
    // Two visible listings and no summary: 2 * 5 = 10 results, 5 pages of 2
    mount_uncounted(&server, 5, |index| {
        results_page(None, index * 2..index * 2 + 2)
    })
    .await;

    let mut config = create_test_config(&server);
    config.max_results_per_page = 2;

    let records = run_scrape(&config).await.unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records[9].title, "Story 9");
}

#[tokio::test]
async fn test_uncounted_results_with_empty_later_page() {
    let server = MockServer::start().await;
    mount_uncounted(&server, 5, |index| {
        if index < 2 {
            results_page(None, index * 2..index * 2 + 2)
        } else {
            results_page(None, 0..0)
        }
    })
    .await;

    let mut config = create_test_config(&server);
    config.max_results_per_page = 2;

    match run_scrape(&config).await {
        Err(ScrapeError::Extract { stage, target, source }) => {
            assert_eq!(stage, Stage::Listings);
            assert!(["page 2", "page 3", "page 4"].contains(&target.as_str()));
            assert_eq!(source, ExtractError::NoListingsFound);
        }
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unrecognized_markup_names_stage_and_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div class="search-hits__meta--total_hits">10 Results</div></body></html>"#,
        ))
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let err = run_scrape(&config).await.unwrap_err();

    match err {
        ScrapeError::Extract { stage, target, source } => {
            assert_eq!(stage, Stage::Listings);
            assert_eq!(target, "page 0");
            assert_eq!(source, ExtractError::NoListingsFound);
        }
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_save_html_writes_debug_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_page(0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RESULTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(Some(1), 0..1)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&server);
    config.scraper.full_text = true;
    config.scraper.save_html = true;
    config.scraper.debug_dir = dir.path().to_string_lossy().into_owned();

    run_scrape(&config).await.unwrap();

    assert!(dir.path().join("debug_response_page0.html").exists());
    assert!(dir.path().join("debug_article_news_0.html").exists());
}
