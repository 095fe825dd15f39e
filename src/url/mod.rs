//! URL handling module
//!
//! Host extraction, rate-limit domain grouping, exclusion lists and record
//! naming. Link resolution against a page lives with the HTML parser.

mod exclusion;
mod matcher;

pub use exclusion::ExclusionList;
pub use matcher::matches_wildcard;

use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the lower-cased host from a URL
///
/// Returns `None` for URLs without a host.
///
/// ```
/// use url::Url;
/// use realestate_crawler::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Builder.com/projects/x/").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.builder.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses an absolute HTTP(S) URL
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns the key under which requests to `url` are rate limited
///
/// Hosts matching one of `groups` share the pattern as their key, so every
/// subdomain of a grouped site is throttled together. Other hosts are keyed
/// by themselves.
pub fn limiter_key(url: &Url, groups: &[String]) -> UrlResult<String> {
    let domain = extract_domain(url).ok_or(UrlError::MissingDomain)?;

    Ok(groups
        .iter()
        .find(|pattern| matches_wildcard(pattern, &domain))
        .cloned()
        .unwrap_or(domain))
}

/// Derives a record name from the last non-empty path segment of a URL
///
/// ```
/// use realestate_crawler::url::residence_name;
///
/// assert_eq!(
///     residence_name("https://builder.com/projects/lakeside-habitat/"),
///     "lakeside-habitat"
/// );
/// ```
pub fn residence_name(url: &str) -> String {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or_default()
        .to_string()
}
