/// Crawl phase definitions for one crawl run
///
/// A run walks the configured sites in order, discovering then extracting
/// each one: `Idle → Discovering(0) → Extracting(0) → Discovering(1) → … → Done`.
use crate::CrawlerError;
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// No site has been started yet
    Idle,

    /// Link discovery is running for the site at this index
    Discovering(usize),

    /// Detail extraction is running for the site at this index
    Extracting(usize),

    /// All sites were processed
    Done,

    /// The run stopped on an unrecovered error
    Failed,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Checks whether moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (*self, next) {
            (Self::Idle, Self::Discovering(0)) => true,
            (Self::Idle, Self::Done) => true,
            (Self::Discovering(i), Self::Extracting(j)) => i == j,
            (Self::Extracting(i), Self::Discovering(j)) => j == i + 1,
            (Self::Extracting(_), Self::Done) => true,
            (from, Self::Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Moves to `next`, rejecting illegal steps
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), CrawlerError> {
        if !self.can_transition_to(next) {
            return Err(CrawlerError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }
}

impl Default for CrawlPhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Discovering(i) => write!(f, "discovering(site {})", i),
            Self::Extracting(i) => write!(f, "extracting(site {})", i),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
