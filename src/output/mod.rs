//! Output module for presenting crawl results
//!
//! - The banner-prefixed listing served by the front doors
//! - Statistics for a finished crawl or an existing store

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

/// Heading printed before the one-shot JSON dump and prefixed to served listings
pub const LISTING_BANNER: &str = "Prestige Property Details";

/// Formats the body served by the generate endpoint
pub fn render_listing(store_contents: &str) -> String {
    format!("{}, {}", LISTING_BANNER, store_contents)
}
