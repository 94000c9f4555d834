use serde::{Deserialize, Serialize};

/// Classifier input preparation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreprocessConfig {
    /// Side length of the square tensor fed to the classifier.
    pub target_size: u32,
    /// Per-image size ceiling, enforced before decode is attempted.
    pub max_image_bytes: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_size: 224,
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Brand verification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandConfig {
    /// Known-brand vocabulary scanned against OCR text, in match-priority
    /// order.
    pub vocabulary: Vec<String>,
    /// Minimum similarity ratio in [0, 100] for a candidate to corroborate
    /// the claimed brand. Inclusive.
    pub match_threshold: f64,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            vocabulary: [
                "maggi",
                "nestle",
                "amul",
                "parle",
                "britannia",
                "haldirams",
                "mtr",
                "patanjali",
                "itc",
                "dabur",
                "mother dairy",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            match_threshold: 80.0,
        }
    }
}

/// Fan-out bounds for per-view processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConcurrencyConfig {
    /// Upper bound on views processed at once.
    pub max_parallel_views: usize,
    /// Per-view deadline covering decode, inference, and OCR.
    pub view_timeout_ms: u64,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_parallel_views: 4,
            view_timeout_ms: 30_000,
        }
    }
}

/// OCR recognition server endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OcrServerConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for OcrServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:39835".to_string(),
            request_timeout_secs: 5,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PipelineConfig {
    pub preprocess: PreprocessConfig,
    pub brand: BrandConfig,
    pub concurrency: ConcurrencyConfig,
    pub ocr_server: OcrServerConfig,
}
