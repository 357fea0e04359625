//! ESSID filtering for network listings
//!
//! Filters use exact string matching unless they contain glob characters
//! (`*`, `?`, `[`), in which case they are compiled as glob patterns.

use anyhow::{anyhow, Result};
use glob::Pattern;

use crate::models::Network;

/// Check if a filter string contains glob pattern characters
pub fn is_glob_pattern(filter: &str) -> bool {
    filter.contains('*') || filter.contains('?') || filter.contains('[')
}

/// Match an ESSID against one filter, exact or glob
pub fn matches_essid_filter(essid: &str, filter: &str) -> bool {
    if is_glob_pattern(filter) {
        match Pattern::new(filter) {
            Ok(pattern) => pattern.matches(essid),
            // Invalid patterns are rejected up front; compare literally if one slips through
            Err(_) => essid == filter,
        }
    } else {
        essid == filter
    }
}

/// Whether a network passes the filter list.
///
/// An empty list accepts every network. Otherwise the network's ESSID must
/// match at least one filter, so cloaked networks without a name never match.
pub fn network_matches_filters(network: &Network, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }
    match network.essid() {
        Some(essid) => filters
            .iter()
            .any(|filter| matches_essid_filter(essid, filter)),
        None => false,
    }
}

/// Validate that all glob filters compile
pub fn validate_essid_filters(filters: &[String]) -> Result<()> {
    for filter in filters {
        if is_glob_pattern(filter) {
            Pattern::new(filter)
                .map_err(|e| anyhow!("Invalid glob pattern '{}': {}", filter, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(essid: Option<&str>) -> Network {
        let mut network = Network::default();
        network.security.essid = essid.map(str::to_string);
        network
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(!is_glob_pattern("HomeNet"));
        assert!(is_glob_pattern("Home*"));
        assert!(is_glob_pattern("Cafe-?"));
        assert!(is_glob_pattern("[Gg]uest"));
    }

    #[test]
    fn test_exact_matching_is_case_sensitive() {
        assert!(matches_essid_filter("HomeNet", "HomeNet"));
        assert!(!matches_essid_filter("HomeNet", "homenet"));
        assert!(!matches_essid_filter("HomeNet", "Home"));
    }

    #[test]
    fn test_glob_matching() {
        assert!(matches_essid_filter("HomeNet-5G", "HomeNet*"));
        assert!(matches_essid_filter("Guest", "[Gg]uest"));
        assert!(matches_essid_filter("Cafe-1", "Cafe-?"));
        assert!(!matches_essid_filter("Cafe-12", "Cafe-?"));
        assert!(!matches_essid_filter("Office", "Home*"));
    }

    #[test]
    fn test_network_matches_filters() {
        let home = named(Some("HomeNet"));
        let cloaked = named(None);

        assert!(network_matches_filters(&home, &[]));
        assert!(network_matches_filters(&cloaked, &[]));

        let filters = vec!["Office".to_string(), "Home*".to_string()];
        assert!(network_matches_filters(&home, &filters));
        assert!(!network_matches_filters(&cloaked, &filters));
        assert!(!network_matches_filters(&named(Some("Cafe")), &filters));
    }

    #[test]
    fn test_validate_essid_filters() {
        assert!(validate_essid_filters(&["HomeNet".to_string()]).is_ok());
        assert!(validate_essid_filters(&["Home*".to_string(), "[Gg]uest".to_string()]).is_ok());
        assert!(validate_essid_filters(&["Home[".to_string()]).is_err());
    }
}
