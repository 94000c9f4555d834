//! Multi-view authenticity checking for packaged food products.
//!
//! A caller submits several photographs of one product (front, back, side,
//! barcode) together with the brand name printed on it. The pipeline
//! classifies each view as REAL or FAKE, extracts printed facts (expiry
//! date, batch number, MRP) via OCR, verifies the photographed brand text
//! against the claim, and merges the per-view outcomes into a single
//! product-level verdict. One bad photograph never sinks the batch: failed
//! views are isolated and the remaining evidence is aggregated.

pub mod error;
pub mod models;
pub mod services;

pub use error::{PipelineError, ValidationError};
pub use models::config::PipelineConfig;
pub use models::verdict::{AggregatedOcr, ProductVerdict};
pub use models::view::{
    ExtractedFields, Label, ViewFailure, ViewInput, ViewResult, ViewStatus, ViewTag,
};
pub use services::aggregator::ProductVerifier;
pub use services::classifier::{Classifier, ClassifierService};
pub use services::ocr::{OcrEngine, OcrService};
