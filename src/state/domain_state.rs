use std::time::{Duration, Instant};

/// Tracks the requests made to one rate-limited domain
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of requests made to this domain in the current process
    pub request_count: u32,

    /// When the most recent request to this domain started
    pub last_request_time: Option<Instant>,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a request to this domain started at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Time left before the next request may start
    ///
    /// Returns None if a request can be made now.
    pub fn time_until_next_request(&self, min_delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_delay {
            Some(min_delay - elapsed)
        } else {
            None
        }
    }
}
