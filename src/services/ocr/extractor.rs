use crate::models::config::BrandConfig;
use crate::models::view::ExtractedFields;
use regex::Regex;

/// Parses structured fields out of raw OCR text: expiry date, batch number,
/// MRP, and known-brand mentions. Patterns are compiled once at
/// construction. Every field is optional; a text with no matches simply
/// yields empty fields.
pub struct FieldExtractor {
    date_pattern: Regex,
    batch_pattern: Regex,
    mrp_pattern: Regex,
    /// Lower-cased vocabulary, scanned in order.
    vocabulary: Vec<String>,
}

impl FieldExtractor {
    pub fn new(config: &BrandConfig) -> Self {
        Self {
            // DD/MM/YYYY or DD.MM.YYYY
            date_pattern: Regex::new(r"(\d{2}/\d{2}/\d{4}|\d{2}\.\d{2}\.\d{4})").unwrap(),
            // "batch", optional "no"/"number", optional punctuation, token
            batch_pattern: Regex::new(r"(?i)batch\s*(?:no\.?|number\.?)?\s*:?\s*([a-z0-9]+)")
                .unwrap(),
            // "mrp", optional punctuation, optional "rs", decimal amount
            mrp_pattern: Regex::new(r"(?i)mrp\.?\s*:?\s*(?:rs\.?)?\s*(\d+(?:\.\d{2})?)").unwrap(),
            vocabulary: config
                .vocabulary
                .iter()
                .map(|b| b.to_lowercase())
                .collect(),
        }
    }

    pub fn extract(&self, raw_text: &str) -> ExtractedFields {
        let text = raw_text.to_lowercase();

        ExtractedFields {
            expiry_date: self
                .date_pattern
                .captures(&text)
                .map(|caps| caps[1].to_string()),
            batch_number: self
                .batch_pattern
                .captures(&text)
                .map(|caps| caps[1].to_uppercase()),
            mrp: self
                .mrp_pattern
                .captures(&text)
                .map(|caps| caps[1].to_string()),
            brand_candidates: self
                .vocabulary
                .iter()
                .filter(|brand| text.contains(brand.as_str()))
                .map(|brand| brand.to_uppercase())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(&BrandConfig::default())
    }

    #[test]
    fn test_label_line_round_trip() {
        let fields = extractor().extract("MRP: Rs.45.00 BATCH NO: AB12 12/06/2025");

        assert_eq!(fields.mrp.as_deref(), Some("45.00"));
        assert_eq!(fields.batch_number.as_deref(), Some("AB12"));
        assert_eq!(fields.expiry_date.as_deref(), Some("12/06/2025"));
    }

    #[test]
    fn test_date_with_dots() {
        let fields = extractor().extract("best before 31.12.2026");
        assert_eq!(fields.expiry_date.as_deref(), Some("31.12.2026"));
    }

    #[test]
    fn test_first_date_wins() {
        let fields = extractor().extract("mfg 01/01/2025 exp 01/01/2026");
        assert_eq!(fields.expiry_date.as_deref(), Some("01/01/2025"));
    }

    #[test]
    fn test_batch_number_variants() {
        assert_eq!(
            extractor().extract("batch number: xy99").batch_number.as_deref(),
            Some("XY99")
        );
        assert_eq!(
            extractor().extract("Batch B7").batch_number.as_deref(),
            Some("B7")
        );
    }

    #[test]
    fn test_mrp_without_rs_prefix() {
        let fields = extractor().extract("mrp 120");
        assert_eq!(fields.mrp.as_deref(), Some("120"));
    }

    #[test]
    fn test_absent_fields_are_none_not_error() {
        let fields = extractor().extract("just some packaging text");
        assert_eq!(fields.expiry_date, None);
        assert_eq!(fields.batch_number, None);
        assert_eq!(fields.mrp, None);
        assert!(fields.brand_candidates.is_empty());
    }

    #[test]
    fn test_brand_scan_is_case_insensitive_and_ordered() {
        let fields = extractor().extract("NESTLE product, also Maggi inside");
        // Vocabulary order, not text order
        assert_eq!(fields.brand_candidates, vec!["MAGGI", "NESTLE"]);
    }

    #[test]
    fn test_brand_scan_reports_each_brand_once() {
        let fields = extractor().extract("maggi maggi maggi");
        assert_eq!(fields.brand_candidates, vec!["MAGGI"]);
    }

    #[test]
    fn test_multi_word_brand() {
        let fields = extractor().extract("a mother dairy product");
        assert_eq!(fields.brand_candidates, vec!["MOTHER DAIRY"]);
    }
}
