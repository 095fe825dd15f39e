//! State module for tracking crawl progress
//!
//! - `CrawlPhase`: where a crawl run is in its site-by-site progression
//! - `DomainState`: per-domain request bookkeeping used by the rate limiter

mod crawl_phase;
mod domain_state;

pub use crawl_phase::CrawlPhase;
pub use domain_state::DomainState;
