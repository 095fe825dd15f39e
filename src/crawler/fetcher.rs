//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent and deadline
//! - Routing every request through the per-domain rate limiter
//! - Classifying transport failures into `FetchError`
//! - Reporting non-2xx responses without failing the fetch

use crate::config::CrawlerConfig;
use crate::crawler::limiter::RateLimiter;
use crate::FetchError;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use url::Url;

/// A fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects, used as the base for relative links
    pub url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Counters describing the fetches made so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCounters {
    pub pages_fetched: u64,
    pub non_success: u64,
    pub failures: u64,
}

/// Builds an HTTP client with proper configuration
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited page fetcher
pub struct Fetcher {
    client: Client,
    limiter: RateLimiter,
    pages_fetched: AtomicU64,
    non_success: AtomicU64,
    failures: AtomicU64,
}

impl Fetcher {
    pub fn new(client: Client, limiter: RateLimiter) -> Self {
        Self {
            client,
            limiter,
            pages_fetched: AtomicU64::new(0),
            non_success: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_http_client(config)?,
            RateLimiter::from_config(config),
        ))
    }

    pub fn counters(&self) -> FetchCounters {
        FetchCounters {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            non_success: self.non_success.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Fetches a URL, waiting for the rate limiter first
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(page)` |
    /// | Other HTTP status | `Ok(page)`, logged at warn |
    /// | Timeout | `Err(FetchError::Timeout)` |
    /// | Connection refused / DNS | `Err(FetchError::Connect)` |
    /// | Body read failure | `Err(FetchError::Body)` |
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let result = self.fetch_inner(url).await;
        if result.is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    async fn fetch_inner(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        let permit = self.limiter.acquire(&parsed).await?;
        tracing::info!("Visiting {}", url);
        tracing::trace!("Holding {} slot for {}", permit.key(), url);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        self.pages_fetched.fetch_add(1, Ordering::Relaxed);

        let page = FetchedPage {
            url: final_url,
            status_code: status.as_u16(),
            body,
        };

        if !page.is_success() {
            self.non_success.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Fetched {} with status {}", url, page.status_code);
        }

        Ok(page)
    }
}

fn classify_error(url: &str, e: reqwest::Error) -> FetchError {
    let url = url.to_string();
    if e.is_timeout() {
        FetchError::Timeout { url }
    } else if e.is_connect() {
        FetchError::Connect { url, source: e }
    } else {
        FetchError::Network { url, source: e }
    }
}
