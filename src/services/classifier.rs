use crate::error::PipelineError;
use crate::models::view::Label;
use ndarray::{s, Array4};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Binary authenticity scorer. `predict` maps a fixed-size image tensor to
/// P(label = REAL) in [0, 1]. Implementations are pure functions of the
/// input given fixed weights, so concurrent calls need no synchronization.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &Array4<f32>) -> Result<f32, String>;
}

/// Derive the winning label and the probability mass assigned to it.
pub fn derive_label(score: f32) -> (Label, f64) {
    if score >= 0.5 {
        (Label::Real, score as f64)
    } else {
        (Label::Fake, 1.0 - score as f64)
    }
}

/// Serialized weights for [`PooledLinearModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelWeights {
    pub channel_weights: [f32; 3],
    pub bias: f32,
}

/// Global-average-pool each channel, apply a 3-weight dense layer, squash
/// through a sigmoid. Matches the trained artifact's head architecture.
pub struct PooledLinearModel {
    weights: ModelWeights,
    input_size: usize,
}

impl PooledLinearModel {
    pub fn new(weights: ModelWeights, input_size: usize) -> Self {
        Self { weights, input_size }
    }
}

impl Classifier for PooledLinearModel {
    fn predict(&self, input: &Array4<f32>) -> Result<f32, String> {
        let expected = [1, self.input_size, self.input_size, 3];
        if input.shape() != expected {
            return Err(format!(
                "malformed tensor shape {:?}, expected {:?}",
                input.shape(),
                expected
            ));
        }

        let mut z = self.weights.bias;
        for channel in 0..3 {
            let pooled = input
                .slice(s![0, .., .., channel])
                .mean()
                .unwrap_or(0.0);
            z += self.weights.channel_weights[channel] * pooled;
        }

        let score = 1.0 / (1.0 + (-z).exp());
        Ok(score.clamp(0.0, 1.0))
    }
}

/// Constant-0.5 stand-in used when the trained artifact is absent. Only
/// ever installed in degraded mode, which every verdict reports.
pub struct NeutralBaseline;

impl Classifier for NeutralBaseline {
    fn predict(&self, _input: &Array4<f32>) -> Result<f32, String> {
        Ok(0.5)
    }
}

/// Process-wide classifier handle: one model, loaded once at startup,
/// shared read-only across all requests.
#[derive(Clone)]
pub struct ClassifierService {
    model: Arc<dyn Classifier>,
    degraded: bool,
}

impl ClassifierService {
    /// Load the trained artifact. A missing file substitutes the neutral
    /// baseline and flags the service as degraded; a file that exists but
    /// cannot be parsed is a hard startup error, since that points at a
    /// misconfigured deployment rather than an absent optional artifact.
    pub fn load(artifact_path: &Path, input_size: u32) -> Result<Self, PipelineError> {
        if !artifact_path.exists() {
            warn!(
                path = %artifact_path.display(),
                "model artifact not found, substituting neutral baseline (degraded mode)"
            );
            return Ok(Self {
                model: Arc::new(NeutralBaseline),
                degraded: true,
            });
        }

        let raw = std::fs::read_to_string(artifact_path)
            .map_err(|e| PipelineError::ModelUnavailable(e.to_string()))?;
        let weights: ModelWeights = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::ModelUnavailable(format!("invalid weights file: {}", e)))?;

        info!(path = %artifact_path.display(), "classifier model loaded");
        Ok(Self {
            model: Arc::new(PooledLinearModel::new(weights, input_size as usize)),
            degraded: false,
        })
    }

    /// Wrap an already-constructed model, e.g. a mock in tests.
    pub fn from_model(model: Arc<dyn Classifier>) -> Self {
        Self {
            model,
            degraded: false,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn score(&self, input: &Array4<f32>) -> Result<f32, String> {
        self.model.predict(input)
    }
}
