use crate::config::types::{Config, CrawlerConfig, ExtractorConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use crate::url::parse_http_url;
use scraper::Selector;

/// Longest accepted delay between requests to one domain
const MAX_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_extractor_config(&config.extractor)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.delay_ms > MAX_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "delay_ms must be <= {}ms, got {}ms",
            MAX_DELAY_MS, config.delay_ms
        )));
    }

    if config.parallelism < 1 || config.parallelism > 16 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and 16, got {}",
            config.parallelism
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for pattern in &config.limit_domains {
        validate_domain_pattern(pattern)?;
    }

    Ok(())
}

/// Validates selectors and labels
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    validate_selector("block_selector", &config.block_selector)?;
    validate_selector("pagination_selector", &config.pagination_selector)?;

    for (name, value) in [
        ("size_label", &config.size_label),
        ("units_label", &config.units_label),
        ("contact_label", &config.contact_label),
        ("separator", &config.separator),
        ("detail_marker", &config.detail_marker),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!("Invalid {} '{}': {:?}", name, selector, e))
    })?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.store_path.is_empty() {
        return Err(ConfigError::Validation(
            "store_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates site entries
fn validate_sites(sites: &[SiteConfig]) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "At least one site must be configured".to_string(),
        ));
    }

    for site in sites {
        parse_http_url(&site.seed_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", site.seed_url, e))
        })?;

        if site.city.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Site '{}' must have a city label",
                site.seed_url
            )));
        }

        if site.exclude.iter().any(|entry| entry.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "Site '{}' has an empty exclusion entry, which would exclude every URL",
                site.seed_url
            )));
        }
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);
    validate_domain_string(domain)
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
