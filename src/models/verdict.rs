use crate::models::view::{ExtractedFields, Label, ViewResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// OCR fields merged across every view of the batch, deduplicated and in
/// first-seen order. Failed views contribute too: text extraction can still
/// be informative when the classifier was not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedOcr {
    pub extracted_brands: Vec<String>,
    pub expiry_dates: Vec<String>,
    pub batch_numbers: Vec<String>,
    pub mrp_values: Vec<String>,
}

impl AggregatedOcr {
    pub fn absorb(&mut self, fields: &ExtractedFields) {
        for brand in &fields.brand_candidates {
            push_unique(&mut self.extracted_brands, brand);
        }
        if let Some(date) = &fields.expiry_date {
            push_unique(&mut self.expiry_dates, date);
        }
        if let Some(batch) = &fields.batch_number {
            push_unique(&mut self.batch_numbers, batch);
        }
        if let Some(mrp) = &fields.mrp {
            push_unique(&mut self.mrp_values, mrp);
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

/// Product-level verdict for one batch of views. Either fully computed or
/// the invocation fails; callers never see a partial verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVerdict {
    pub claimed_brand: String,
    pub overall_prediction: Label,
    pub overall_confidence: f64,
    pub brand_match: bool,
    pub ocr_results: AggregatedOcr,
    pub views: Vec<ViewResult>,
    /// True when the classifier ran on a fallback artifact instead of the
    /// canonical trained model. Surfaced on every verdict, never silently.
    pub degraded_mode: bool,
    pub processing_time_seconds: f64,
    pub analyzed_at: DateTime<Utc>,
}

impl ProductVerdict {
    /// Boundary-layer representation: `detailed_analysis` keyed by view tag
    /// with just the per-view prediction, confidence, and OCR text.
    pub fn to_response(&self) -> serde_json::Value {
        let mut detailed = serde_json::Map::new();
        for view in &self.views {
            detailed.insert(
                view.tag.to_string(),
                json!({
                    "prediction": view.label,
                    "confidence": view.confidence,
                    "ocr_text": view.raw_text,
                }),
            );
        }
        json!({
            "overall_prediction": self.overall_prediction,
            "overall_confidence": self.overall_confidence,
            "processing_time": self.processing_time_seconds,
            "brand_match": self.brand_match,
            "degraded_mode": self.degraded_mode,
            "ocr_results": self.ocr_results,
            "detailed_analysis": detailed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::view::{ViewStatus, ViewTag};

    fn fields_with(brand: &str, date: &str) -> ExtractedFields {
        ExtractedFields {
            expiry_date: Some(date.to_string()),
            batch_number: None,
            mrp: None,
            brand_candidates: vec![brand.to_string()],
        }
    }

    #[test]
    fn test_absorb_deduplicates() {
        let mut agg = AggregatedOcr::default();
        agg.absorb(&fields_with("MAGGI", "12/06/2025"));
        agg.absorb(&fields_with("MAGGI", "12/06/2025"));
        agg.absorb(&fields_with("NESTLE", "01/01/2026"));

        assert_eq!(agg.extracted_brands, vec!["MAGGI", "NESTLE"]);
        assert_eq!(agg.expiry_dates, vec!["12/06/2025", "01/01/2026"]);
    }

    #[test]
    fn test_absorb_preserves_first_seen_order() {
        let mut agg = AggregatedOcr::default();
        agg.absorb(&fields_with("NESTLE", "01/01/2026"));
        agg.absorb(&fields_with("AMUL", "01/01/2026"));
        assert_eq!(agg.extracted_brands, vec!["NESTLE", "AMUL"]);
    }

    #[test]
    fn test_response_shape() {
        let verdict = ProductVerdict {
            claimed_brand: "maggi".into(),
            overall_prediction: Label::Real,
            overall_confidence: 0.9,
            brand_match: true,
            ocr_results: AggregatedOcr::default(),
            views: vec![ViewResult {
                tag: ViewTag::Front,
                label: Some(Label::Real),
                confidence: 0.9,
                raw_text: "maggi noodles".into(),
                fields: ExtractedFields::default(),
                status: ViewStatus::Ok,
            }],
            degraded_mode: false,
            processing_time_seconds: 0.1,
            analyzed_at: Utc::now(),
        };

        let response = verdict.to_response();
        assert_eq!(response["overall_prediction"], "REAL");
        assert_eq!(response["brand_match"], true);
        assert_eq!(response["detailed_analysis"]["front"]["prediction"], "REAL");
        assert_eq!(
            response["detailed_analysis"]["front"]["ocr_text"],
            "maggi noodles"
        );
    }
}
