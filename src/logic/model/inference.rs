//! Inference Engine
//!
//! The classifier seam. Anything that maps a [`FeatureVector`] to
//! `[p_negative, p_positive]` can back the scorer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::FeatureVector;

/// Model metadata, captured once at load time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub model_path: String,
    pub model_type: String,
    pub features: usize,
    pub calibrated: bool,
    /// SHA-256 of the artifact bytes
    pub sha256: String,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("feature vector has {got} values, model expects {expected}")]
    Dimension { expected: usize, got: usize },

    #[error("inference failed: {0}")]
    Backend(String),
}

/// Read-only binary classifier shared across requests
pub trait Classifier: Send + Sync {
    /// Returns `[p_negative, p_positive]`
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError>;

    fn metadata(&self) -> &ModelMetadata;
}
