//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building HTTP clients with a browser-like identity and a bounded timeout
//! - GET requests to fetch page content
//! - Error classification

use crate::config::PolitenessConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Something that can retrieve a page by URL
///
/// Implementations never fail outright: every problem is reported as a
/// `FetchResult` variant so callers can classify it per item.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - Timeout and identity settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &PolitenessConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.request_timeout);

    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// Redirects are followed by the client. A 2xx response with a readable body
/// is a success; any other status is an `HttpError`; anything that prevents
/// a response from arriving is a `NetworkError`. There are no retries.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                format!("Request timeout: {}", e)
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &PolitenessConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}
