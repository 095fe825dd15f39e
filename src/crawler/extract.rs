//! Detail extraction
//!
//! Turns one detail page into a [`Residence`] record.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{parse_details, DetailFields, SiteLayout};
use crate::storage::Residence;
use crate::url::residence_name;
use crate::FetchError;

/// Fetches detail pages and parses their attribute block
pub struct DetailExtractor<'a> {
    fetcher: &'a Fetcher,
    layout: &'a SiteLayout,
}

impl<'a> DetailExtractor<'a> {
    pub fn new(fetcher: &'a Fetcher, layout: &'a SiteLayout) -> Self {
        Self { fetcher, layout }
    }

    /// Extracts the record for `url`, stamping it with `city`
    ///
    /// A page without the attribute block still produces a record, with the
    /// three attribute fields left empty. A failed fetch is returned as is.
    pub async fn extract(&self, url: &str, city: &str) -> Result<Residence, FetchError> {
        let page = self.fetcher.fetch(url).await?;

        let fields = match parse_details(&page.body, self.layout) {
            Some(fields) => {
                tracing::debug!("Found details for {}", url);
                fields
            }
            None => {
                tracing::debug!("No attribute block on {}, keeping a sparse record", url);
                DetailFields::default()
            }
        };

        Ok(build_residence(url, city, fields))
    }
}

/// Assembles a record from a detail URL, its city and the parsed fields
pub fn build_residence(url: &str, city: &str, fields: DetailFields) -> Residence {
    Residence {
        name: residence_name(url),
        url: url.to_string(),
        city: city.to_string(),
        project_size: fields.project_size,
        num_units: fields.num_units,
        phone_no: fields.phone_no,
    }
}
