//! Integration tests for resumable batch scraping
//!
//! These tests run the scraper against a wiremock server with the on-disk
//! checkpoint store and CSV sink, interrupting and restarting runs.

use cursor_crawl::config::{Config, CrawlerConfig, OutputConfig, PolitenessConfig};
use cursor_crawl::crawler::{
    load_status, run_scrape, BatchScraper, FetchResult, Fetcher, HttpFetcher, RateLimiter,
    Shutdown,
};
use cursor_crawl::output::{write_links, CsvResultSink};
use cursor_crawl::storage::{ProgressStore, SqliteProgressStore};
use cursor_crawl::CrawlError;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: "https://example.com/".to_string(),
            max_depth: 1,
        },
        politeness: PolitenessConfig {
            min_delay: 0.0,
            max_delay: 0.0,
            request_timeout: 5,
            user_agent: "TestBot/1.0".to_string(),
        },
        output: OutputConfig {
            links_path: dir.join("links.csv").display().to_string(),
            progress_path: dir.join("progress.db").display().to_string(),
            results_path: dir.join("results.csv").display().to_string(),
        },
    }
}

/// Mounts `/p0` .. `/p{count-1}` and returns their URLs in order
async fn mount_pages(server: &MockServer, count: usize) -> Vec<String> {
    let mut links = Vec::with_capacity(count);
    for i in 0..count {
        let route = format!("/p{}", i);
        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "<html><head><title>Page {i}</title></head>\
                 <body><h1>Heading {i}</h1><p>Body {i}</p>\
                 <div id=\"program-info\">Program {i}</div></body></html>"
            )))
            .mount(server)
            .await;
        links.push(format!("{}{}", server.uri(), route));
    }
    links
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

/// Triggers shutdown once `limit` fetches have completed
struct InterruptingFetcher {
    inner: HttpFetcher,
    calls: AtomicUsize,
    limit: usize,
    shutdown: Shutdown,
}

impl Fetcher for InterruptingFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let result = self.inner.fetch(url).await;
        if self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= self.limit {
            self.shutdown.trigger();
        }
        result
    }
}

#[tokio::test]
async fn test_interrupted_run_resumes_at_next_link() {
    let mock_server = MockServer::start().await;
    let links = mount_pages(&mock_server, 10).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    write_links(Path::new(&config.output.links_path), &links).unwrap();

    // First run stops after four pages
    let shutdown = Shutdown::new();
    let fetcher = InterruptingFetcher {
        inner: HttpFetcher::from_config(&config.politeness).unwrap(),
        calls: AtomicUsize::new(0),
        limit: 4,
        shutdown: shutdown.clone(),
    };
    let mut scraper = BatchScraper::new(
        fetcher,
        SqliteProgressStore::open(Path::new(&config.output.progress_path)),
        CsvResultSink::new(Path::new(&config.output.results_path)),
        RateLimiter::disabled(),
    )
    .with_shutdown(shutdown);

    let first = scraper.run(&links).await;
    drop(scraper);

    assert!(first.interrupted);
    assert_eq!(first.next_index, 4);
    assert_eq!(
        requested_paths(&mock_server).await,
        vec!["/p0", "/p1", "/p2", "/p3"]
    );
    assert_eq!(load_status(&config), (4, 10));

    // Second run picks up at /p4
    let second = run_scrape(&config, false, Shutdown::new()).await.unwrap();

    assert!(!second.interrupted);
    assert_eq!(second.start_index, 4);
    assert_eq!(second.scraped, 6);
    assert!(second.is_complete());

    let expected: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    assert_eq!(requested_paths(&mock_server).await, expected);

    let (headers, rows) = read_rows(Path::new(&config.output.results_path));
    assert_eq!(
        headers,
        vec!["URL", "Domain", "Title", "Headings", "Content", "Program Info"]
    );
    assert_eq!(rows.len(), 10);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row[0], links[i]);
        assert_eq!(row[1], "127.0.0.1");
        assert_eq!(row[2], format!("Page {}", i));
        assert_eq!(row[5], format!("Program {}", i));
    }

    assert_eq!(load_status(&config), (10, 10));
}

#[tokio::test]
async fn test_completed_list_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let links = mount_pages(&mock_server, 3).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    write_links(Path::new(&config.output.links_path), &links).unwrap();

    run_scrape(&config, false, Shutdown::new()).await.unwrap();
    let again = run_scrape(&config, false, Shutdown::new()).await.unwrap();

    assert_eq!(again.processed(), 0);
    assert_eq!(requested_paths(&mock_server).await.len(), 3);

    let (_, rows) = read_rows(Path::new(&config.output.results_path));
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_fresh_run_starts_over() {
    let mock_server = MockServer::start().await;
    let links = mount_pages(&mock_server, 2).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    write_links(Path::new(&config.output.links_path), &links).unwrap();

    run_scrape(&config, false, Shutdown::new()).await.unwrap();
    let fresh = run_scrape(&config, true, Shutdown::new()).await.unwrap();

    assert_eq!(fresh.start_index, 0);
    assert_eq!(fresh.scraped, 2);
    assert_eq!(requested_paths(&mock_server).await.len(), 4);
}

#[tokio::test]
async fn test_failed_and_blank_links_advance_cursor() {
    let mock_server = MockServer::start().await;
    let mut links = mount_pages(&mock_server, 2).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    links.insert(1, format!("{}/broken", mock_server.uri()));
    links.insert(2, String::new());

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    write_links(Path::new(&config.output.links_path), &links).unwrap();

    let stats = run_scrape(&config, false, Shutdown::new()).await.unwrap();

    assert_eq!(stats.total, 4);
    assert_eq!(stats.scraped, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(requested_paths(&mock_server).await.len(), 3);

    let (_, rows) = read_rows(Path::new(&config.output.results_path));
    assert_eq!(rows.len(), 2);

    let mut progress = SqliteProgressStore::open(Path::new(&config.output.progress_path));
    assert_eq!(progress.load(), 4);
}

#[tokio::test]
async fn test_missing_link_list_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());

    let result = run_scrape(&config, false, Shutdown::new()).await;

    assert!(matches!(result, Err(CrawlError::InputLoad { .. })));
    assert!(!Path::new(&config.output.results_path).exists());
}
