/// Ordered substrings that veto detail URLs
///
/// A URL is excluded when it contains any entry, compared case-sensitively.
/// Entry order has no effect on the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    entries: Vec<String>,
}

impl ExclusionList {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Returns the first entry contained in `url`, if any
    pub fn matching_entry(&self, url: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(String::as_str)
            .find(|entry| url.contains(entry))
    }
}

impl From<&[String]> for ExclusionList {
    fn from(entries: &[String]) -> Self {
        Self::new(entries.to_vec())
    }
}
