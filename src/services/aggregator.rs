use crate::error::{PipelineError, ValidationError};
use crate::models::config::PipelineConfig;
use crate::models::verdict::{AggregatedOcr, ProductVerdict};
use crate::models::view::{ExtractedFields, Label, ViewFailure, ViewInput, ViewResult, ViewTag};
use crate::services::brand::BrandMatcher;
use crate::services::classifier::{derive_label, ClassifierService};
use crate::services::ocr::OcrService;
use crate::services::preprocess::ImagePreprocessor;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Views the batch must contain before any model call is made.
const REQUIRED_VIEWS: [ViewTag; 2] = [ViewTag::Front, ViewTag::Back];

/// Orchestrates the whole pipeline: validates the batch, fans per-view
/// classification and OCR out over a bounded worker pool, and merges the
/// independent per-view results into one product-level verdict.
///
/// Services are constructed once at startup and injected here; all of them
/// are read-only after construction, so the fan-out phase needs no locks.
pub struct ProductVerifier {
    preprocessor: Arc<ImagePreprocessor>,
    classifier: ClassifierService,
    ocr: Arc<OcrService>,
    brand_matcher: BrandMatcher,
    max_parallel_views: usize,
    view_timeout_ms: u64,
}

impl ProductVerifier {
    pub fn new(classifier: ClassifierService, ocr: OcrService, config: &PipelineConfig) -> Self {
        Self {
            preprocessor: Arc::new(ImagePreprocessor::new(config.preprocess.clone())),
            classifier,
            ocr: Arc::new(ocr),
            brand_matcher: BrandMatcher::new(&config.brand),
            max_parallel_views: config.concurrency.max_parallel_views,
            view_timeout_ms: config.concurrency.view_timeout_ms,
        }
    }

    /// Run the full pipeline for one product.
    ///
    /// Dropping the returned future aborts in-flight per-view tasks; a
    /// cancelled invocation produces no partial verdict.
    pub async fn verify(
        &self,
        claimed_brand: &str,
        views: Vec<ViewInput>,
    ) -> Result<ProductVerdict, PipelineError> {
        let started = Instant::now();
        validate_batch(claimed_brand, &views)?;

        let total = views.len();
        info!(views = total, brand = claimed_brand, "verifying product batch");

        let semaphore = Arc::new(Semaphore::new(self.max_parallel_views));
        let mut join_set = JoinSet::new();

        for (index, view) in views.into_iter().enumerate() {
            let preprocessor = Arc::clone(&self.preprocessor);
            let classifier = self.classifier.clone();
            let ocr = Arc::clone(&self.ocr);
            let semaphore = Arc::clone(&semaphore);
            let timeout_ms = self.view_timeout_ms;

            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore is never closed");
                let tag = view.tag;

                // Decode, inference, and OCR are all blocking work
                let work = tokio::task::spawn_blocking(move || {
                    process_view(view, &preprocessor, &classifier, &ocr)
                });

                let result = match tokio::time::timeout(Duration::from_millis(timeout_ms), work)
                    .await
                {
                    Ok(Ok(view_result)) => view_result,
                    Ok(Err(join_error)) => ViewResult::failed(
                        tag,
                        ViewFailure::Inference(join_error.to_string()),
                        String::new(),
                        ExtractedFields::default(),
                    ),
                    Err(_) => ViewResult::failed(
                        tag,
                        ViewFailure::Timeout(timeout_ms),
                        String::new(),
                        ExtractedFields::default(),
                    ),
                };
                (index, result)
            });
        }

        // Fan-in: restore submission order regardless of completion order
        let mut slots: Vec<Option<ViewResult>> = (0..total).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            let (index, result) = joined.map_err(|e| PipelineError::Task(e.to_string()))?;
            debug!(view = %result.tag, ok = result.status.is_ok(), "view processed");
            slots[index] = Some(result);
        }
        let views: Vec<ViewResult> = slots.into_iter().flatten().collect();

        let merged = merge_views(&views);
        if merged.ok_views == 0 {
            return Err(PipelineError::AllViewsFailed { attempted: total });
        }

        let brand_match = self
            .brand_matcher
            .matches(&merged.ocr.extracted_brands, claimed_brand);

        Ok(ProductVerdict {
            claimed_brand: claimed_brand.to_string(),
            overall_prediction: merged.label,
            overall_confidence: merged.confidence,
            brand_match,
            ocr_results: merged.ocr,
            views,
            degraded_mode: self.classifier.is_degraded(),
            processing_time_seconds: started.elapsed().as_secs_f64(),
            analyzed_at: Utc::now(),
        })
    }
}

fn validate_batch(claimed_brand: &str, views: &[ViewInput]) -> Result<(), ValidationError> {
    if claimed_brand.trim().is_empty() {
        return Err(ValidationError::MissingBrand);
    }
    if views.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    let missing: Vec<ViewTag> = REQUIRED_VIEWS
        .into_iter()
        .filter(|required| !views.iter().any(|view| view.tag == *required))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingViews(missing));
    }
    Ok(())
}

/// Classify and OCR one view. Decode and inference failures mark the view
/// FAILED but keep whatever the (independent) OCR pass salvaged.
fn process_view(
    view: ViewInput,
    preprocessor: &ImagePreprocessor,
    classifier: &ClassifierService,
    ocr: &OcrService,
) -> ViewResult {
    let (raw_text, fields) = ocr.process(&view.bytes);

    let tensor = match preprocessor.preprocess(&view.bytes) {
        Ok(tensor) => tensor,
        Err(e) => return ViewResult::failed(view.tag, ViewFailure::Decode(e), raw_text, fields),
    };
    let score = match classifier.score(&tensor) {
        Ok(score) => score,
        Err(e) => return ViewResult::failed(view.tag, ViewFailure::Inference(e), raw_text, fields),
    };

    let (label, confidence) = derive_label(score);
    ViewResult::ok(view.tag, label, confidence, raw_text, fields)
}

struct MergedViews {
    label: Label,
    confidence: f64,
    ocr: AggregatedOcr,
    ok_views: usize,
}

/// Pure reduction over per-view results.
///
/// Labels: majority vote over OK views; ties, including the zero-evidence
/// case, resolve to FAKE. Confidence: mean over OK views, 0.0 when none.
/// OCR fields: unioned across every view regardless of status.
fn merge_views(views: &[ViewResult]) -> MergedViews {
    let mut n_real = 0usize;
    let mut n_fake = 0usize;
    let mut confidence_sum = 0.0;
    let mut ocr = AggregatedOcr::default();

    for view in views {
        ocr.absorb(&view.fields);
        if view.status.is_ok() {
            match view.label {
                Some(Label::Real) => n_real += 1,
                Some(Label::Fake) => n_fake += 1,
                None => {}
            }
            confidence_sum += view.confidence;
        }
    }

    let ok_views = n_real + n_fake;
    let label = if n_real > n_fake { Label::Real } else { Label::Fake };
    let confidence = if ok_views > 0 {
        confidence_sum / ok_views as f64
    } else {
        0.0
    };

    MergedViews {
        label,
        confidence,
        ocr,
        ok_views,
    }
}
