//! Link discovery
//!
//! Walks a site's index pages, following pagination, and collects the detail
//! URLs it links to.

use crate::config::FetchErrorPolicy;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{parse_page_links, SiteLayout};
use crate::url::ExclusionList;
use crate::FetchError;
use std::collections::{HashSet, VecDeque};

/// Outcome of offering a detail link to the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkVerdict {
    Accepted,
    Duplicate,
    Excluded(String),
}

/// Discovered detail URLs plus the pages still to visit for one site
#[derive(Debug, Default)]
pub struct CrawlFrontier {
    discovered: Vec<String>,
    accepted: HashSet<String>,
    visited: HashSet<String>,
    pending: VecDeque<String>,
}

impl CrawlFrontier {
    /// Creates a frontier whose first visit is the navigation root
    pub fn new(seed_url: &str) -> Self {
        let mut frontier = Self::default();
        frontier.schedule_visit(seed_url);
        frontier
    }

    /// Records a detail URL unless it is a duplicate or excluded
    pub fn offer_detail(&mut self, url: &str, exclusions: &ExclusionList) -> LinkVerdict {
        if self.accepted.contains(url) {
            return LinkVerdict::Duplicate;
        }
        if let Some(entry) = exclusions.matching_entry(url) {
            return LinkVerdict::Excluded(entry.to_string());
        }
        self.accepted.insert(url.to_string());
        self.discovered.push(url.to_string());
        LinkVerdict::Accepted
    }

    /// Queues a page for rendering; returns false if it was already queued
    pub fn schedule_visit(&mut self, url: &str) -> bool {
        if !self.visited.insert(url.to_string()) {
            return false;
        }
        self.pending.push_back(url.to_string());
        true
    }

    pub fn next_visit(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// Number of distinct pages ever queued, the seed included
    pub fn pages_scheduled(&self) -> usize {
        self.visited.len()
    }

    /// Consumes the frontier, returning detail URLs in first-discovered order
    pub fn into_discovered(self) -> Vec<String> {
        self.discovered
    }
}

/// Enumerates the detail pages reachable from a seed index page
pub struct LinkDiscoverer<'a> {
    fetcher: &'a Fetcher,
    layout: &'a SiteLayout,
    policy: FetchErrorPolicy,
    follow_detail_pages: bool,
}

impl<'a> LinkDiscoverer<'a> {
    pub fn new(fetcher: &'a Fetcher, layout: &'a SiteLayout, policy: FetchErrorPolicy) -> Self {
        Self {
            fetcher,
            layout,
            policy,
            follow_detail_pages: true,
        }
    }

    /// Whether accepted detail pages are rendered during discovery too
    pub fn follow_detail_pages(mut self, follow: bool) -> Self {
        self.follow_detail_pages = follow;
        self
    }

    /// Returns the accepted detail URLs in first-discovered order
    ///
    /// Every page (seed, pagination target, followed detail page) is fetched
    /// at most once, so traversal ends once no unvisited links remain.
    pub async fn discover(
        &self,
        seed_url: &str,
        exclusions: &ExclusionList,
    ) -> Result<Vec<String>, FetchError> {
        let mut frontier = CrawlFrontier::new(seed_url);

        while let Some(page_url) = frontier.next_visit() {
            let page = match self.fetcher.fetch(&page_url).await {
                Ok(page) => page,
                Err(e) => match self.policy {
                    FetchErrorPolicy::Abort => return Err(e),
                    FetchErrorPolicy::Skip => {
                        tracing::warn!("Skipping {} during discovery: {}", page_url, e);
                        continue;
                    }
                },
            };

            let links = parse_page_links(&page.body, &page.url, self.layout);

            for link in &links.detail_links {
                match frontier.offer_detail(link, exclusions) {
                    LinkVerdict::Accepted => {
                        tracing::info!("Adding : {}", link);
                        if self.follow_detail_pages {
                            frontier.schedule_visit(link);
                        }
                    }
                    LinkVerdict::Duplicate => tracing::trace!("Already discovered {}", link),
                    LinkVerdict::Excluded(entry) => {
                        tracing::debug!("Excluding {} (matches '{}')", link, entry)
                    }
                }
            }

            for next in &links.pagination_links {
                if frontier.schedule_visit(next) {
                    tracing::debug!("Following pagination to {}", next);
                }
            }
        }

        tracing::debug!(
            "Discovery from {} visited {} pages",
            seed_url,
            frontier.pages_scheduled()
        );
        Ok(frontier.into_discovered())
    }
}
