/// Checks if a host matches a rate-limit domain pattern
///
/// `"builder.com"` matches only itself. `"*.builder.com"` matches the bare
/// domain and any subdomain at any depth. Hosts are expected lower-cased.
///
/// ```
/// use realestate_crawler::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.builder.com", "www.builder.com"));
/// assert!(matches_wildcard("*.builder.com", "builder.com"));
/// assert!(!matches_wildcard("*.builder.com", "mybuilder.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}
