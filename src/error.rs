use crate::models::view::ViewTag;
use thiserror::Error;

/// Malformed batch, detected before any per-view work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("batch contains no images")]
    EmptyBatch,

    #[error("claimed brand name is empty")]
    MissingBrand,

    #[error("image count {images} does not match view tag count {tags}")]
    CountMismatch { images: usize, tags: usize },

    #[error("required views missing: {}", join_tags(.0))]
    MissingViews(Vec<ViewTag>),
}

/// Request-level pipeline failure. Per-view decode/inference/OCR problems
/// are recovered locally as a `FAILED` view status and never surface here
/// unless every view failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Every view failed at decode/inference; there is no usable evidence
    /// for a verdict. Distinct from an evenly-split vote, which resolves
    /// to FAKE.
    #[error("all {attempted} views failed before producing a classifier score")]
    AllViewsFailed { attempted: usize },

    /// The model artifact exists but cannot be loaded. A *missing* artifact
    /// is not an error: it substitutes a neutral baseline in degraded mode.
    #[error("classifier model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("view task failed: {0}")]
    Task(String),
}

fn join_tags(tags: &[ViewTag]) -> String {
    tags.iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_views_lists_tags() {
        let err = ValidationError::MissingViews(vec![ViewTag::Front, ViewTag::Back]);
        assert_eq!(err.to_string(), "required views missing: front, back");
    }

    #[test]
    fn test_count_mismatch_message() {
        let err = ValidationError::CountMismatch { images: 3, tags: 2 };
        assert_eq!(
            err.to_string(),
            "image count 3 does not match view tag count 2"
        );
    }

    #[test]
    fn test_validation_error_converts_to_pipeline_error() {
        let err: PipelineError = ValidationError::EmptyBatch.into();
        assert!(matches!(err, PipelineError::Validation(ValidationError::EmptyBatch)));
    }
}
