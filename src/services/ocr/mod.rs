pub mod engine;
pub mod extractor;
pub mod http_ocr;

pub use engine::OcrEngine;
pub use extractor::FieldExtractor;
pub use http_ocr::HttpOcrEngine;

use crate::models::config::BrandConfig;
use crate::models::view::ExtractedFields;
use std::sync::Arc;
use tracing::warn;

/// Recognition engine plus structured-field extraction. OCR is advisory:
/// an engine failure degrades to empty text and no fields rather than
/// failing the view.
pub struct OcrService {
    engine: Arc<dyn OcrEngine>,
    extractor: FieldExtractor,
}

impl OcrService {
    pub fn new(engine: Arc<dyn OcrEngine>, brand_config: &BrandConfig) -> Self {
        Self {
            engine,
            extractor: FieldExtractor::new(brand_config),
        }
    }

    /// Recognize and parse one view's image. Returns the lower-cased raw
    /// text and whatever structured fields were found.
    pub fn process(&self, image_bytes: &[u8]) -> (String, ExtractedFields) {
        match self.engine.recognize(image_bytes) {
            Ok(text) => {
                let text = text.to_lowercase();
                let fields = self.extractor.extract(&text);
                (text, fields)
            }
            Err(e) => {
                warn!("OCR recognition failed, continuing without text: {}", e);
                (String::new(), ExtractedFields::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEngine(&'static str);

    impl OcrEngine for FixedEngine {
        fn recognize(&self, _image_bytes: &[u8]) -> Result<String, String> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenEngine;

    impl OcrEngine for BrokenEngine {
        fn recognize(&self, _image_bytes: &[u8]) -> Result<String, String> {
            Err("recognition backend crashed".to_string())
        }
    }

    #[test]
    fn test_process_lowercases_and_extracts() {
        let service = OcrService::new(
            Arc::new(FixedEngine("MAGGI Noodles MRP: Rs.45.00")),
            &BrandConfig::default(),
        );
        let (text, fields) = service.process(b"image");
        assert_eq!(text, "maggi noodles mrp: rs.45.00");
        assert_eq!(fields.brand_candidates, vec!["MAGGI"]);
        assert_eq!(fields.mrp.as_deref(), Some("45.00"));
    }

    #[test]
    fn test_engine_failure_degrades_to_empty() {
        let service = OcrService::new(Arc::new(BrokenEngine), &BrandConfig::default());
        let (text, fields) = service.process(b"image");
        assert_eq!(text, "");
        assert_eq!(fields, ExtractedFields::default());
    }
}
