//! HTML parsing for index and detail pages
//!
//! Index pages yield candidate detail links and pagination targets; detail
//! pages yield the labeled attribute block. Everything here is synchronous and
//! works on an already fetched body.

use crate::config::ExtractorConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled description of the site layout
#[derive(Debug, Clone)]
pub struct SiteLayout {
    anchors: Selector,
    pagination: Selector,
    block: Selector,
    pub detail_marker: String,
    pub size_label: String,
    pub units_label: String,
    pub contact_label: String,
    pub separator: String,
}

impl SiteLayout {
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            anchors: compile("a[href]")?,
            pagination: compile(&config.pagination_selector)?,
            block: compile(&config.block_selector)?,
            detail_marker: config.detail_marker.clone(),
            size_label: config.size_label.clone(),
            units_label: config.units_label.clone(),
            contact_label: config.contact_label.clone(),
            separator: config.separator.clone(),
        })
    }

    /// Whether an absolute URL points at a project detail page
    pub fn is_detail_url(&self, url: &str) -> bool {
        url.contains(&self.detail_marker)
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::Validation(format!("Invalid selector '{}': {:?}", selector, e)))
}

/// Links found on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// Absolute detail URLs in document order, duplicates included
    pub detail_links: Vec<String>,

    /// Absolute "next page" targets, one per pagination control
    pub pagination_links: Vec<String>,
}

/// Extracts detail links and pagination targets from a page
///
/// # Example
///
/// ```
/// use realestate_crawler::config::ExtractorConfig;
/// use realestate_crawler::crawler::{parse_page_links, SiteLayout};
/// use url::Url;
///
/// let layout = SiteLayout::from_config(&ExtractorConfig::default()).unwrap();
/// let base = Url::parse("https://builder.com/residential/").unwrap();
/// let html = r#"<a href="/projects/sunrise/">Sunrise</a>
///     <div class="pagination"><a href="/residential/page/2/">Next</a></div>"#;
///
/// let links = parse_page_links(html, &base, &layout);
/// assert_eq!(links.detail_links, vec!["https://builder.com/projects/sunrise/"]);
/// assert_eq!(links.pagination_links, vec!["https://builder.com/residential/page/2/"]);
/// ```
pub fn parse_page_links(html: &str, base_url: &Url, layout: &SiteLayout) -> PageLinks {
    let document = Html::parse_document(html);

    let detail_links = document
        .select(&layout.anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .filter(|url| layout.is_detail_url(url))
        .collect();

    let pagination_links = document
        .select(&layout.pagination)
        .filter_map(|control| next_page_href(control, &layout.anchors))
        .filter_map(|href| resolve_link(href, base_url))
        .collect();

    PageLinks {
        detail_links,
        pagination_links,
    }
}

/// Picks the "next" anchor of a pagination control
///
/// An anchor marked `rel="next"`, classed `next`, or labeled "next"/"»"/"›"
/// wins; otherwise the control's first anchor is used. On a purely numbered
/// control that first anchor is usually an already visited page, so such a
/// chain stops after the second page.
fn next_page_href<'a>(control: ElementRef<'a>, anchors: &Selector) -> Option<&'a str> {
    let candidates: Vec<ElementRef<'a>> = control.select(anchors).collect();

    let marked_next = candidates.iter().find(|a| {
        let element = a.value();
        let rel_next = element
            .attr("rel")
            .is_some_and(|rel| rel.split_whitespace().any(|r| r == "next"));
        let class_next = element.classes().any(|c| c == "next");
        let text = a.text().collect::<String>().trim().to_lowercase();
        rel_next || class_next || text.contains("next") || text == "»" || text == "›"
    });

    marked_next
        .or_else(|| candidates.first())
        .and_then(|a| a.value().attr("href"))
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be skipped:
/// - empty, fragment-only, `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - hrefs that fail to resolve against the base
/// - anything that is not HTTP(S) after resolution
///
/// The fragment is dropped, so `/projects/a/#amenities` and `/projects/a/`
/// resolve to the same page.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    absolute.set_fragment(None);
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}

/// Attribute values parsed from a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub project_size: String,
    pub num_units: String,
    pub phone_no: String,
}

/// Parses the labeled attribute block of a detail page
///
/// The first element matching the block selector whose text contains all
/// three labels is used. Each of its child elements is checked for a label in
/// the order size, units, contact; the value is everything after the first
/// separator, trimmed but otherwise left as the page wrote it. A label seen
/// twice keeps the last value. Returns None when no block carries all three labels.
pub fn parse_details(html: &str, layout: &SiteLayout) -> Option<DetailFields> {
    let document = Html::parse_document(html);

    let block = document.select(&layout.block).find(|block| {
        let text = block.text().collect::<String>();
        text.contains(&layout.size_label)
            && text.contains(&layout.units_label)
            && text.contains(&layout.contact_label)
    })?;

    let mut fields = DetailFields::default();

    for child in block.children().filter_map(ElementRef::wrap) {
        let segment = child.text().collect::<String>();

        let target = if segment.contains(&layout.size_label) {
            &mut fields.project_size
        } else if segment.contains(&layout.units_label) {
            &mut fields.num_units
        } else if segment.contains(&layout.contact_label) {
            &mut fields.phone_no
        } else {
            continue;
        };

        match value_after_separator(&segment, &layout.separator) {
            Some(value) => *target = value,
            None => tracing::debug!("Labeled segment without separator: {:?}", segment.trim()),
        }
    }

    Some(fields)
}

fn value_after_separator(segment: &str, separator: &str) -> Option<String> {
    let (_, value) = segment.split_once(separator)?;
    Some(value.trim().to_string())
}
