//! Per-domain rate limiting
//!
//! Every request to a domain group holds one of that group's permits for the
//! whole fetch, and consecutive request starts are spaced by at least the
//! configured delay.

use crate::config::CrawlerConfig;
use crate::state::DomainState;
use crate::url::limiter_key;
use crate::FetchError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use url::Url;

/// Limits for one domain group
struct DomainSlot {
    permits: Arc<Semaphore>,
    state: Mutex<DomainState>,
}

/// Held while a request to a domain is in flight
pub struct DomainPermit {
    key: String,
    _permit: OwnedSemaphorePermit,
}

impl DomainPermit {
    /// The domain group this permit belongs to
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Bounded-concurrency, fixed-delay limiter keyed by domain group
pub struct RateLimiter {
    delay: Duration,
    parallelism: usize,
    groups: Vec<String>,
    slots: Mutex<HashMap<String, Arc<DomainSlot>>>,
}

impl RateLimiter {
    pub fn new(delay: Duration, parallelism: usize, groups: Vec<String>) -> Self {
        Self {
            delay,
            parallelism: parallelism.max(1),
            groups,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.delay_ms),
            config.parallelism as usize,
            config.limit_domains.clone(),
        )
    }

    async fn slot(&self, key: &str) -> Arc<DomainSlot> {
        let mut slots = self.slots.lock().await;
        slots
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(DomainSlot {
                    permits: Arc::new(Semaphore::new(self.parallelism)),
                    state: Mutex::new(DomainState::new()),
                })
            })
            .clone()
    }

    /// Waits until a request to `url` may start
    ///
    /// Keep the returned permit alive until the response body has been read.
    pub async fn acquire(&self, url: &Url) -> Result<DomainPermit, FetchError> {
        let key = limiter_key(url, &self.groups).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        let slot = self.slot(&key).await;

        let permit = slot
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| FetchError::LimiterClosed {
                url: url.to_string(),
            })?;

        loop {
            let mut state = slot.state.lock().await;
            let now = Instant::now();
            match state.time_until_next_request(self.delay, now) {
                Some(wait) => {
                    drop(state);
                    tracing::trace!("Waiting {:?} before next request to {}", wait, key);
                    tokio::time::sleep(wait).await;
                }
                None => {
                    state.record_request(now);
                    break;
                }
            }
        }

        Ok(DomainPermit {
            key,
            _permit: permit,
        })
    }
}
