//! Shared fixtures for the integration tests

use realestate_crawler::config::{Config, SiteConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a fast configuration for crawling the mock server
pub fn test_config(sites: Vec<SiteConfig>) -> Config {
    let mut config = Config::default();
    config.crawler.delay_ms = 0;
    config.crawler.timeout_secs = 5;
    config.crawler.limit_domains = vec![];
    config.sites = sites;
    config
}

/// An index page linking to the given hrefs, with an optional pagination control
pub fn index_page(links: &[&str], next: Option<&str>) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    let pagination = next
        .map(|href| format!(r#"<div class="pagination"><a href="{}">Next</a></div>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Residential</title></head><body>
        <nav><a href="/about/">About</a><a href="/contact/">Contact</a></nav>
        <ul class="projects">{}</ul>
        {}
        </body></html>"#,
        anchors, pagination
    )
}

/// A detail page carrying the labeled attribute block
pub fn detail_page(size: &str, units: &str, phone: &str) -> String {
    format!(
        r#"<html><body>
        <h1>Project</h1>
        <ul class="list-two-col">
            <li><span>Development Size</span>: {}</li>
            <li><span>Number of Units</span>: {}</li>
            <li><span>Contact No</span>: {}</li>
        </ul>
        </body></html>"#,
        size, units, phone
    )
}

/// A detail page without the attribute block
pub fn bare_detail_page() -> String {
    r#"<html><body><h1>Project</h1><p>Details coming soon.</p></body></html>"#.to_string()
}

/// Mounts a GET route that must be hit exactly `times` times
pub async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}
