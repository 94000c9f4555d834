use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One photographed angle of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewTag {
    Front,
    Back,
    Side,
    Barcode,
    Other,
}

impl ViewTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewTag::Front => "front",
            ViewTag::Back => "back",
            ViewTag::Side => "side",
            ViewTag::Barcode => "barcode",
            ViewTag::Other => "other",
        }
    }
}

impl fmt::Display for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front" => Ok(ViewTag::Front),
            "back" => Ok(ViewTag::Back),
            "side" => Ok(ViewTag::Side),
            "barcode" => Ok(ViewTag::Barcode),
            "other" => Ok(ViewTag::Other),
            other => Err(format!("unknown view tag: '{}'", other)),
        }
    }
}

/// Per-view and product-level classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Real,
    Fake,
}

/// Raw image bytes plus the angle they were shot from. Supplied by the
/// caller, never mutated by the pipeline.
#[derive(Debug, Clone)]
pub struct ViewInput {
    pub tag: ViewTag,
    pub bytes: Vec<u8>,
}

impl ViewInput {
    pub fn new(tag: ViewTag, bytes: Vec<u8>) -> Self {
        Self { tag, bytes }
    }

    /// Pair parallel image and tag lists into view inputs. Counts must match
    /// exactly; no tag is ever defaulted for a spare image.
    pub fn pair(images: Vec<Vec<u8>>, tags: Vec<ViewTag>) -> Result<Vec<ViewInput>, ValidationError> {
        if images.len() != tags.len() {
            return Err(ValidationError::CountMismatch {
                images: images.len(),
                tags: tags.len(),
            });
        }
        Ok(images
            .into_iter()
            .zip(tags)
            .map(|(bytes, tag)| ViewInput { tag, bytes })
            .collect())
    }
}

/// Why a view's classification could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ViewFailure {
    /// Image bytes could not be decoded (corrupt, unsupported, oversized).
    Decode(String),
    /// The classifier could not score the tensor.
    Inference(String),
    /// Processing exceeded the per-view deadline (milliseconds).
    Timeout(u64),
}

/// OK views contribute a label and confidence to aggregation; FAILED views
/// contribute only whatever OCR fields were salvaged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum ViewStatus {
    Ok,
    Failed { reason: ViewFailure },
}

impl ViewStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ViewStatus::Ok)
    }
}

/// Structured fields parsed out of one view's OCR text. Each field is
/// optional; absence is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub expiry_date: Option<String>,
    pub batch_number: Option<String>,
    pub mrp: Option<String>,
    /// Known-brand vocabulary entries found in the text, in vocabulary
    /// order, upper-cased. A presence scan, so duplicates cannot occur.
    pub brand_candidates: Vec<String>,
}

/// Outcome for a single view. Created once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResult {
    pub tag: ViewTag,
    /// `None` when the view failed before classification.
    pub label: Option<Label>,
    /// Probability mass assigned to the winning label; 0.0 for failed views.
    pub confidence: f64,
    pub raw_text: String,
    pub fields: ExtractedFields,
    #[serde(flatten)]
    pub status: ViewStatus,
}

impl ViewResult {
    pub fn ok(
        tag: ViewTag,
        label: Label,
        confidence: f64,
        raw_text: String,
        fields: ExtractedFields,
    ) -> Self {
        Self {
            tag,
            label: Some(label),
            confidence,
            raw_text,
            fields,
            status: ViewStatus::Ok,
        }
    }

    /// A failed view keeps any OCR text and fields recovered before the
    /// failure, so best-effort extraction still feeds the merged output.
    pub fn failed(tag: ViewTag, reason: ViewFailure, raw_text: String, fields: ExtractedFields) -> Self {
        Self {
            tag,
            label: None,
            confidence: 0.0,
            raw_text,
            fields,
            status: ViewStatus::Failed { reason },
        }
    }
}
