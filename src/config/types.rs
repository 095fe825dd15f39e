use serde::Deserialize;

/// Store file used when no configuration overrides it
pub const DEFAULT_STORE_PATH: &str = "./realestatedb.json";

/// Port the HTTP front door listens on by default
pub const DEFAULT_PORT: u16 = 8080;

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(rename = "site", default = "default_sites")]
    pub sites: Vec<SiteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            extractor: ExtractorConfig::default(),
            output: OutputConfig::default(),
            server: ServerConfig::default(),
            sites: default_sites(),
        }
    }
}

/// What the orchestrator does with a page that could not be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchErrorPolicy {
    /// Log the gap and keep crawling
    Skip,
    /// Stop the run at the first failure
    Abort,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Minimum time between requests to the same domain (milliseconds)
    pub delay_ms: u64,

    /// Maximum in-flight requests per domain
    pub parallelism: u32,

    /// Per-request transport deadline (seconds)
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    pub on_fetch_error: FetchErrorPolicy,

    /// Render accepted detail pages during discovery so their links are followed too
    pub follow_detail_pages: bool,

    /// Domain patterns (e.g. "*.example.com") whose hosts share one rate limit
    pub limit_domains: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            parallelism: 1,
            timeout_secs: 30,
            user_agent: format!("realestate-crawler/{}", env!("CARGO_PKG_VERSION")),
            on_fetch_error: FetchErrorPolicy::Skip,
            follow_detail_pages: true,
            limit_domains: vec!["*.prestigeconstructions.com".to_string()],
        }
    }
}

/// Selectors and labels describing the site layout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExtractorConfig {
    /// Selector for candidate attribute blocks on a detail page
    pub block_selector: String,

    pub size_label: String,
    pub units_label: String,
    pub contact_label: String,

    /// Separator between a label and its value
    pub separator: String,

    /// Literal path fragment that marks a detail URL
    pub detail_marker: String,

    /// Selector for the pagination control on index pages
    pub pagination_selector: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            block_selector: "ul[class=list-two-col]".to_string(),
            size_label: "Development Size".to_string(),
            units_label: "Number of Units".to_string(),
            contact_label: "Contact No".to_string(),
            separator: ":".to_string(),
            detail_marker: "projects/".to_string(),
            pagination_selector: ".pagination".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path to the JSON store file
    pub store_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            store_path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

/// HTTP front door configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// One builder/region to crawl
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Index page the discovery starts from
    pub seed_url: String,

    /// City label stamped on every record from this site
    pub city: String,

    /// Substrings that veto otherwise valid detail URLs
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl SiteConfig {
    pub fn new(seed_url: impl Into<String>, city: impl Into<String>, exclude: Vec<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            city: city.into(),
            exclude,
        }
    }
}

fn default_sites() -> Vec<SiteConfig> {
    vec![
        SiteConfig::new(
            "https://www.prestigeconstructions.com/residential-bangalore-property/",
            "Bangalore",
            vec![],
        ),
        SiteConfig::new(
            "https://www.prestigeconstructions.com/residential-apartments-villas-chennai/",
            "Chennai",
            vec!["falcon-city".to_string()],
        ),
        SiteConfig::new(
            "https://www.prestigeconstructions.com/residential-apartments-villas-kochi/",
            "Kochi",
            vec!["falcon-city".to_string()],
        ),
    ]
}
