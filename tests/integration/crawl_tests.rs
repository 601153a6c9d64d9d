//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the fetcher and the crawl cycle end-to-end.

use cursor_crawl::config::{Config, CrawlerConfig, OutputConfig, PolitenessConfig};
use cursor_crawl::crawler::{
    run_crawl, CrawlEngine, FetchResult, Fetcher, HttpFetcher, RateLimiter, Shutdown,
};
use cursor_crawl::output::read_links;
use cursor_crawl::storage::{MemoryFrontierStore, SqliteProgressStore};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_AGENT: &str = "TestBot/1.0";

/// Creates a test configuration crawling from `seed_url`
fn create_test_config(seed_url: &str, max_depth: u32, dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed_url.to_string(),
            max_depth,
        },
        politeness: PolitenessConfig {
            min_delay: 0.0,
            max_delay: 0.0,
            request_timeout: 5,
            user_agent: TEST_AGENT.to_string(),
        },
        output: OutputConfig {
            links_path: dir.join("links.csv").display().to_string(),
            progress_path: dir.join("progress.db").display().to_string(),
            results_path: dir.join("results.csv").display().to_string(),
        },
    }
}

fn html_page(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, anchors
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
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

fn test_fetcher() -> HttpFetcher {
    let config = create_test_config("https://example.com/", 0, Path::new("."));
    HttpFetcher::from_config(&config.politeness).expect("Failed to build client")
}

#[tokio::test]
async fn test_fetch_success_sends_identity() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", TEST_AGENT))
        .respond_with(html_page("Page", &[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = test_fetcher()
        .fetch(&format!("{}/page", mock_server.uri()))
        .await;

    match result {
        FetchResult::Success {
            status_code, body, ..
        } => {
            assert_eq!(status_code, 200);
            assert!(body.contains("<title>Page</title>"));
        }
        other => panic!("Expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/gone", ResponseTemplate::new(410)).await;

    let result = test_fetcher()
        .fetch(&format!("{}/gone", mock_server.uri()))
        .await;

    assert_eq!(result, FetchResult::HttpError { status_code: 410 });
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Nothing listens on port 1
    let result = test_fetcher().fetch("http://127.0.0.1:1/page").await;

    assert!(matches!(result, FetchResult::NetworkError { .. }));
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page(
            "Home",
            &[
                "/page1",
                "/page2#section",
                "https://other.invalid/offsite",
                "/missing",
                "mailto:info@example.com",
            ],
        ),
    )
    .await;
    mount_page(&mock_server, "/page1", html_page("Page 1", &["/", "/page2"])).await;
    mount_page(&mock_server, "/page2", html_page("Page 2", &["/page1"])).await;
    // Unmatched routes such as /missing answer 404

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", base_url), 2, dir.path());

    let report = run_crawl(&config, false, Shutdown::new())
        .await
        .expect("Crawl failed");

    let mut paths = requested_paths(&mock_server).await;
    paths.sort();
    assert_eq!(paths, vec!["/", "/missing", "/page1", "/page2"]);

    assert_eq!(report.collected.len(), 3);
    assert_eq!(report.failed, 1);
    assert!(!report.interrupted);

    let saved = read_links(Path::new(&config.output.links_path)).unwrap();
    assert_eq!(saved, report.collected);
    assert_eq!(saved[0], format!("{}/", base_url));
}

#[tokio::test]
async fn test_depth_bound_with_max_depth_one() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_page("Root", &["/one"])).await;
    mount_page(&mock_server, "/one", html_page("One", &["/two"])).await;
    mount_page(&mock_server, "/two", html_page("Two", &[])).await;

    let mut engine = CrawlEngine::new(
        test_fetcher(),
        MemoryFrontierStore::default(),
        RateLimiter::disabled(),
        1,
    );
    let report = engine
        .crawl(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();

    let paths = requested_paths(&mock_server).await;
    assert!(paths.contains(&"/one".to_string()));
    assert!(!paths.contains(&"/two".to_string()));
    assert_eq!(report.collected.len(), 2);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html_page("Root", &["/dup", "/dup#a", "/dup#b", "/other"]),
    )
    .await;
    mount_page(&mock_server, "/other", html_page("Other", &["/dup", "/"])).await;
    Mock::given(method("GET"))
        .and(path("/dup"))
        .respond_with(html_page("Dup", &["/dup"]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut engine = CrawlEngine::new(
        test_fetcher(),
        MemoryFrontierStore::default(),
        RateLimiter::disabled(),
        5,
    );
    let report = engine
        .crawl(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(report.collected.len(), 3);
    assert_eq!(requested_paths(&mock_server).await.len(), 3);
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

async fn mount_hub_site(server: &MockServer, children: usize) {
    let routes: Vec<String> = (0..children).map(|i| format!("/c{}", i)).collect();
    let hrefs: Vec<&str> = routes.iter().map(String::as_str).collect();
    mount_page(server, "/", html_page("Hub", &hrefs)).await;
    for route in &routes {
        mount_page(server, route, html_page(route, &["/"])).await;
    }
}

#[tokio::test]
async fn test_interrupted_crawl_resumes_where_it_stopped() {
    let mock_server = MockServer::start().await;
    mount_hub_site(&mock_server, 9).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", mock_server.uri()), 1, dir.path());

    // First run stops after four pages
    let shutdown = Shutdown::new();
    let fetcher = InterruptingFetcher {
        inner: test_fetcher(),
        calls: AtomicUsize::new(0),
        limit: 4,
        shutdown: shutdown.clone(),
    };
    let mut engine = CrawlEngine::new(
        fetcher,
        SqliteProgressStore::open(Path::new(&config.output.progress_path)),
        RateLimiter::disabled(),
        1,
    )
    .with_shutdown(shutdown);
    let partial = engine.crawl(&config.crawler.seed_url).await.unwrap();
    drop(engine);

    assert!(partial.interrupted);
    assert_eq!(requested_paths(&mock_server).await, vec!["/", "/c0", "/c1", "/c2"]);

    // Second run fetches only the remaining pages
    let report = run_crawl(&config, false, Shutdown::new()).await.unwrap();

    assert!(!report.interrupted);
    assert_eq!(report.collected.len(), 10);
    let mut expected = vec!["/".to_string()];
    expected.extend((0..9).map(|i| format!("/c{}", i)));
    assert_eq!(requested_paths(&mock_server).await, expected);

    let saved = read_links(Path::new(&config.output.links_path)).unwrap();
    assert_eq!(saved.len(), 10);
}

#[tokio::test]
async fn test_fresh_crawl_starts_over() {
    let mock_server = MockServer::start().await;
    mount_hub_site(&mock_server, 2).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", mock_server.uri()), 1, dir.path());

    run_crawl(&config, false, Shutdown::new()).await.unwrap();
    let rerun = run_crawl(&config, false, Shutdown::new()).await.unwrap();
    assert_eq!(requested_paths(&mock_server).await.len(), 3);
    assert_eq!(rerun.collected.len(), 3);

    let fresh = run_crawl(&config, true, Shutdown::new()).await.unwrap();
    assert_eq!(fresh.collected.len(), 3);
    assert_eq!(requested_paths(&mock_server).await.len(), 6);
}
