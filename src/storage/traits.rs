//! Storage traits and error types

use crate::storage::Residence;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store not found: {0}")]
    Missing(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent snapshot of the records produced by one crawl run
pub trait Store: Send + Sync {
    /// Location of the snapshot, for diagnostics
    fn path(&self) -> &Path;

    /// Whether a snapshot exists (the cache-valid signal)
    fn exists(&self) -> bool;

    /// Replaces the snapshot with `records`, preserving their order
    fn save(&self, records: &[Residence]) -> StoreResult<()>;

    /// Reads the snapshot back as records
    fn load(&self) -> StoreResult<Vec<Residence>>;

    /// Reads the snapshot verbatim, as it is served to clients
    fn read_raw(&self) -> StoreResult<String>;
}
