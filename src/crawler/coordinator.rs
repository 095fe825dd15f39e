//! Crawler coordinator - main crawl orchestration logic
//!
//! Runs link discovery and then detail extraction for each configured site,
//! strictly in configuration order, accumulating every record into one
//! collection.

use crate::config::{Config, FetchErrorPolicy, SiteConfig};
use crate::crawler::discover::LinkDiscoverer;
use crate::crawler::extract::DetailExtractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::SiteLayout;
use crate::output::CrawlStatistics;
use crate::state::CrawlPhase;
use crate::storage::{Residence, Store};
use crate::url::ExclusionList;
use crate::CrawlerError;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    layout: SiteLayout,
    phase: CrawlPhase,
    records_skipped: u64,
}

impl Coordinator {
    /// Creates a coordinator with its own rate-limited fetcher
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        let fetcher = Fetcher::from_config(&config.crawler)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Result<Self, CrawlerError> {
        let layout = SiteLayout::from_config(&config.extractor)?;
        Ok(Self {
            config,
            fetcher,
            layout,
            phase: CrawlPhase::Idle,
            records_skipped: 0,
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Runs every configured site and returns all records
    ///
    /// Records are grouped by site in configuration order, then by discovery
    /// order within a site. A coordinator runs once; a second call fails with
    /// an invalid transition.
    pub async fn run(&mut self) -> Result<Vec<Residence>, CrawlerError> {
        match self.run_sites().await {
            Ok(records) => Ok(records),
            Err(e) => {
                if !self.phase.is_terminal() {
                    self.phase = CrawlPhase::Failed;
                }
                Err(e)
            }
        }
    }

    async fn run_sites(&mut self) -> Result<Vec<Residence>, CrawlerError> {
        if self.phase != CrawlPhase::Idle {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: CrawlPhase::Discovering(0),
            });
        }

        let start_time = Instant::now();
        let sites = self.config.sites.clone();
        let mut records = Vec::new();

        tracing::info!("Starting crawl of {} sites", sites.len());

        for (index, site) in sites.iter().enumerate() {
            self.phase.transition(CrawlPhase::Discovering(index))?;
            tracing::info!("Discovering {} projects from {}", site.city, site.seed_url);
            let urls = self.discover_site(site).await?;
            tracing::info!("Discovered {} projects for {}", urls.len(), site.city);

            self.phase.transition(CrawlPhase::Extracting(index))?;
            let before = records.len();
            self.extract_site(site, &urls, &mut records).await?;
            tracing::info!(
                "Extracted {} records for {}",
                records.len() - before,
                site.city
            );
        }

        self.phase.transition(CrawlPhase::Done)?;

        tracing::info!(
            "Crawl completed: {} records in {:?}",
            records.len(),
            start_time.elapsed()
        );

        Ok(records)
    }

    async fn discover_site(&self, site: &SiteConfig) -> Result<Vec<String>, CrawlerError> {
        let exclusions = ExclusionList::from(site.exclude.as_slice());
        let discoverer =
            LinkDiscoverer::new(&self.fetcher, &self.layout, self.config.crawler.on_fetch_error)
                .follow_detail_pages(self.config.crawler.follow_detail_pages);

        Ok(discoverer.discover(&site.seed_url, &exclusions).await?)
    }

    async fn extract_site(
        &mut self,
        site: &SiteConfig,
        urls: &[String],
        records: &mut Vec<Residence>,
    ) -> Result<(), CrawlerError> {
        let extractor = DetailExtractor::new(&self.fetcher, &self.layout);
        let mut skipped = 0;

        for url in urls {
            match extractor.extract(url, &site.city).await {
                Ok(residence) => records.push(residence),
                Err(e) => match self.config.crawler.on_fetch_error {
                    FetchErrorPolicy::Abort => return Err(e.into()),
                    FetchErrorPolicy::Skip => {
                        tracing::warn!("Skipping record for {}: {}", url, e);
                        skipped += 1;
                    }
                },
            }
        }

        self.records_skipped += skipped;
        Ok(())
    }

    /// Summarizes a finished run
    pub fn statistics(&self, records: &[Residence]) -> CrawlStatistics {
        let cities: Vec<&str> = self.config.sites.iter().map(|s| s.city.as_str()).collect();
        let mut stats = CrawlStatistics::from_records(records, &cities);
        stats.record_fetches(self.fetcher.counters());
        stats.records_skipped = self.records_skipped;
        stats
    }
}

/// Runs a complete crawl and logs its statistics
pub async fn run_crawl(config: Config) -> Result<Vec<Residence>, CrawlerError> {
    let mut coordinator = Coordinator::new(config)?;
    let records = coordinator.run().await?;
    coordinator.statistics(&records).log();
    Ok(records)
}

/// Crawls every site and replaces the store with the result
///
/// The store is only written once the whole run succeeded.
pub async fn regenerate_store(
    config: Config,
    store: &dyn Store,
) -> Result<Vec<Residence>, CrawlerError> {
    let records = run_crawl(config).await?;
    store.save(&records)?;
    tracing::info!(
        "Stored {} records in {}",
        records.len(),
        store.path().display()
    );
    Ok(records)
}
