//! Statistics for crawl results
//!
//! Built from the records of a finished run (or a reloaded store) plus the
//! fetcher's counters when a live crawl produced them.

use crate::crawler::FetchCounters;
use crate::storage::Residence;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of records
    pub total_records: usize,

    /// Record count per city, configured cities first in configuration order
    pub records_by_city: Vec<(String, usize)>,

    /// Records with none of the labeled attributes
    pub sparse_records: usize,

    /// Pages whose body was received
    pub pages_fetched: u64,

    /// Pages received with a non-2xx status
    pub non_success_responses: u64,

    /// Fetches that failed at the transport level
    pub fetch_failures: u64,

    /// Detail pages dropped because their fetch failed
    pub records_skipped: u64,
}

impl CrawlStatistics {
    /// Counts records per city and sparse records
    ///
    /// Cities present in the records but not in `cities` are appended in the
    /// order they first appear.
    pub fn from_records(records: &[Residence], cities: &[&str]) -> Self {
        let mut records_by_city: Vec<(String, usize)> =
            cities.iter().map(|city| (city.to_string(), 0)).collect();

        for record in records {
            match records_by_city.iter_mut().find(|(city, _)| *city == record.city) {
                Some((_, count)) => *count += 1,
                None => records_by_city.push((record.city.clone(), 1)),
            }
        }

        Self {
            total_records: records.len(),
            records_by_city,
            sparse_records: records.iter().filter(|r| r.is_sparse()).count(),
            ..Self::default()
        }
    }

    pub fn record_fetches(&mut self, counters: FetchCounters) {
        self.pages_fetched = counters.pages_fetched;
        self.non_success_responses = counters.non_success;
        self.fetch_failures = counters.failures;
    }

    /// Share of records that carry at least one attribute, in percent
    pub fn completeness(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        let complete = self.total_records - self.sparse_records;
        (complete as f64 / self.total_records as f64) * 100.0
    }

    /// Logs the summary through tracing
    pub fn log(&self) {
        tracing::info!(
            "Records: {} ({} sparse, {:.1}% with details)",
            self.total_records,
            self.sparse_records,
            self.completeness()
        );
        for (city, count) in &self.records_by_city {
            tracing::info!("  {}: {}", city, count);
        }
        tracing::info!(
            "Pages fetched: {}, non-2xx: {}, failed fetches: {}, skipped records: {}",
            self.pages_fetched,
            self.non_success_responses,
            self.fetch_failures,
            self.records_skipped
        );
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Listing Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!("  Sparse records: {}", stats.sparse_records);
    println!();

    println!("Records by City:");
    for (city, count) in &stats.records_by_city {
        let percentage = if stats.total_records > 0 {
            (*count as f64 / stats.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", city, count, percentage);
    }
    println!();

    println!(
        "Completeness: {:.1}% ({} / {} records with details)",
        stats.completeness(),
        stats.total_records - stats.sparse_records,
        stats.total_records
    );
}
