//! Crawler module for discovering and extracting property listings
//!
//! This module contains the core crawling logic, including:
//! - Rate-limited HTTP fetching
//! - Link discovery across paginated index pages
//! - Attribute extraction from detail pages
//! - Overall crawl coordination

mod coordinator;
mod discover;
mod extract;
mod fetcher;
mod limiter;
mod parser;

pub use coordinator::{regenerate_store, run_crawl, Coordinator};
pub use discover::{CrawlFrontier, LinkDiscoverer, LinkVerdict};
pub use extract::{build_residence, DetailExtractor};
pub use fetcher::{build_http_client, FetchCounters, FetchedPage, Fetcher};
pub use limiter::{DomainPermit, RateLimiter};
pub use parser::{
    parse_details, parse_page_links, resolve_link, DetailFields, PageLinks, SiteLayout,
};
