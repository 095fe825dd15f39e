//! Configuration module
//!
//! Configuration is optional: without a file the built-in site list and
//! crawler defaults are used. A TOML file can override any section.
//!
//! # Example
//!
//! ```no_run
//! use realestate_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawling {} sites", config.sites.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractorConfig, FetchErrorPolicy, OutputConfig, ServerConfig,
    SiteConfig, DEFAULT_PORT, DEFAULT_STORE_PATH,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
