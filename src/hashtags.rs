//! Hashtag input normalization and the shared result types.

use std::collections::BTreeMap;

/// Countries every analysis is broken down by, in display order.
pub const COUNTRIES: [&str; 8] = [
    "USA",
    "UK",
    "Canada",
    "Australia",
    "Germany",
    "France",
    "Brazil",
    "India",
];

/// Usage count per country name.
pub type CountryUsageMap = BTreeMap<String, u64>;

/// Per-country usage keyed by hashtag.
pub type AnalysisResult = BTreeMap<String, CountryUsageMap>;

/// Split a raw comma-separated string into hashtags.
///
/// Fragments are trimmed and empty ones dropped. A `#` is prepended only when
/// the fragment does not already start with one, so `"##a"` is kept as is.
/// Duplicates are preserved.
pub fn normalize_hashtags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('#') {
                s.to_string()
            } else {
                format!("#{}", s)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepends_missing_hash() {
        assert_eq!(normalize_hashtags("travel, #food"), vec!["#travel", "#food"]);
    }

    #[test]
    fn test_keeps_existing_hashes() {
        assert_eq!(normalize_hashtags("##a"), vec!["##a"]);
        assert_eq!(normalize_hashtags("#fitness"), vec!["#fitness"]);
    }

    #[test]
    fn test_drops_empty_fragments() {
        assert!(normalize_hashtags(",,,").is_empty());
        assert!(normalize_hashtags(" , ,").is_empty());
        assert_eq!(normalize_hashtags(" art ,, photo ,"), vec!["#art", "#photo"]);
    }

    #[test]
    fn test_no_deduplication() {
        assert_eq!(normalize_hashtags("food, #food"), vec!["#food", "#food"]);
    }

    #[test]
    fn test_every_tag_starts_with_hash() {
        let tags = normalize_hashtags("a, #b, ##c,  d e ,#");
        assert_eq!(tags.len(), 5);
        assert!(tags.iter().all(|t| t.starts_with('#') && !t.is_empty()));
        assert_eq!(tags[3], "#d e");
        assert_eq!(tags[4], "#");
    }
}
