//! Storage module for persisting extracted listings
//!
//! The store is a single JSON array of [`Residence`] records. Its presence on
//! disk is the cache-valid signal used by the HTTP front door; it is only ever
//! replaced wholesale by a new crawl.

mod json;
mod traits;

pub use json::{to_pretty_json, JsonStore};
pub use traits::{Store, StoreError, StoreResult};

use serde::{Deserialize, Serialize};

/// One extracted property listing
///
/// Field names are serialized exactly as existing consumers of the store
/// expect them (`Name`, `URL`, `City`, `ProjectSize`, `NumUnits`, `PhoneNo`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residence {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "City")]
    pub city: String,

    /// Raw text after the development-size label, empty if absent
    #[serde(rename = "ProjectSize")]
    pub project_size: String,

    /// Raw text after the unit-count label, empty if absent
    #[serde(rename = "NumUnits")]
    pub num_units: String,

    /// Raw text after the contact-number label, empty if absent
    #[serde(rename = "PhoneNo")]
    pub phone_no: String,
}

impl Residence {
    /// True when none of the labeled attributes were found on the page
    pub fn is_sparse(&self) -> bool {
        self.project_size.is_empty() && self.num_units.is_empty() && self.phone_no.is_empty()
    }
}
