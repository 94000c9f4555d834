use crate::models::config::BrandConfig;

/// Fuzzy verification of OCR-extracted brand candidates against the
/// user-claimed brand. Similarity is a normalized edit-distance ratio
/// scaled to [0, 100]; minor OCR misreads still corroborate the claim.
pub struct BrandMatcher {
    threshold: f64,
}

impl BrandMatcher {
    pub fn new(config: &BrandConfig) -> Self {
        Self {
            threshold: config.match_threshold,
        }
    }

    /// Case-insensitive similarity ratio between two strings, in [0, 100].
    pub fn similarity(a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0
    }

    /// True when any candidate reaches the threshold (inclusive). No
    /// candidates means no evidence, which is not a match.
    pub fn matches(&self, candidates: &[String], claimed_brand: &str) -> bool {
        if candidates.is_empty() {
            return false;
        }
        candidates
            .iter()
            .any(|candidate| Self::similarity(candidate, claimed_brand) >= self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> BrandMatcher {
        BrandMatcher::new(&BrandConfig::default())
    }

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_differs_only_in_case() {
        assert!(matcher().matches(&candidates(&["MAGGI"]), "maggi"));
    }

    #[test]
    fn test_empty_candidates_never_match() {
        assert!(!matcher().matches(&[], "maggi"));
    }

    #[test]
    fn test_one_edit_in_five_chars_sits_exactly_on_the_boundary() {
        // "magga" vs "maggi": 1 edit over max length 5 gives ratio 80.0,
        // which the inclusive threshold accepts
        let score = BrandMatcher::similarity("MAGGA", "maggi");
        assert!((score - 80.0).abs() < 1e-9, "expected 80.0, got {}", score);
        assert!(matcher().matches(&candidates(&["MAGGA"]), "maggi"));
    }

    #[test]
    fn test_below_threshold_rejected() {
        let score = BrandMatcher::similarity("PARLE", "maggi");
        assert!(score < 80.0, "parle/maggi scored {}", score);
        assert!(!matcher().matches(&candidates(&["PARLE"]), "maggi"));
    }

    #[test]
    fn test_any_candidate_suffices() {
        assert!(matcher().matches(&candidates(&["PARLE", "MAGGI"]), "maggi"));
    }

    #[test]
    fn test_threshold_is_tunable() {
        let strict = BrandMatcher::new(&BrandConfig {
            match_threshold: 90.0,
            ..BrandConfig::default()
        });
        assert!(!strict.matches(&candidates(&["MAGGA"]), "maggi"));
    }
}
