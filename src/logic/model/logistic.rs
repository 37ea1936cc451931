//! Calibrated logistic-regression classifier
//!
//! The artifact is a JSON document exported by the training pipeline:
//! standardizing scaler, linear weights and an optional Platt sigmoid fitted
//! on a held-out split.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::inference::{Classifier, InferenceError, ModelMetadata};
use crate::logic::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Platt scaling: `p = 1 / (1 + exp(a * f + b))`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlattCalibration {
    pub a: f64,
    pub b: f64,
}

/// On-disk model format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub feature_names: Vec<String>,
    pub scaler: Scaler,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub calibration: Option<PlattCalibration>,
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

impl ModelArtifact {
    /// Reject artifacts whose shape does not match the feature vector.
    pub fn check(&self) -> Result<(), ModelLoadError> {
        if self.feature_names.len() != FEATURE_COUNT
            || self.feature_names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b)
        {
            return Err(ModelLoadError::Invalid(format!(
                "feature_names must be {:?}",
                FEATURE_NAMES
            )));
        }

        for (label, values) in [
            ("coefficients", &self.coefficients),
            ("scaler.mean", &self.scaler.mean),
            ("scaler.scale", &self.scaler.scale),
        ] {
            if values.len() != FEATURE_COUNT {
                return Err(ModelLoadError::Invalid(format!(
                    "{} has {} values, expected {}",
                    label,
                    values.len(),
                    FEATURE_COUNT
                )));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ModelLoadError::Invalid(format!("{} contains non-finite values", label)));
            }
        }

        if self.scaler.scale.iter().any(|s| *s == 0.0) {
            return Err(ModelLoadError::Invalid("scaler.scale contains zero".to_string()));
        }

        let calibration_finite = self
            .calibration
            .map(|c| c.a.is_finite() && c.b.is_finite())
            .unwrap_or(true);
        if !self.intercept.is_finite() || !calibration_finite {
            return Err(ModelLoadError::Invalid("intercept or calibration is non-finite".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LogisticModel {
    artifact: ModelArtifact,
    metadata: ModelMetadata,
}

impl LogisticModel {
    pub fn from_artifact(artifact: ModelArtifact, metadata: ModelMetadata) -> Result<Self, ModelLoadError> {
        artifact.check()?;
        Ok(Self { artifact, metadata })
    }

    /// Linear decision function on standardized inputs
    fn decision(&self, x: &[f64]) -> f64 {
        let scaler = &self.artifact.scaler;
        x.iter()
            .zip(&self.artifact.coefficients)
            .zip(scaler.mean.iter().zip(&scaler.scale))
            .map(|((x, w), (mean, scale))| w * (x - mean) / scale)
            .sum::<f64>()
            + self.artifact.intercept
    }
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        let x = features.as_slice();
        if x.len() != self.artifact.coefficients.len() {
            return Err(InferenceError::Dimension {
                expected: self.artifact.coefficients.len(),
                got: x.len(),
            });
        }

        let f = self.decision(x);
        let positive = match self.artifact.calibration {
            Some(PlattCalibration { a, b }) => 1.0 / (1.0 + (a * f + b).exp()),
            None => 1.0 / (1.0 + (-f).exp()),
        };

        Ok([1.0 - positive, positive])
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

/// Load the classifier artifact from disk
pub fn load_classifier(path: &Path) -> Result<LogisticModel, ModelLoadError> {
    tracing::info!("Loading model artifact from: {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| ModelLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;

    let metadata = ModelMetadata {
        name: artifact.name.clone(),
        model_path: path.display().to_string(),
        model_type: "logistic_regression".to_string(),
        features: artifact.coefficients.len(),
        calibrated: artifact.calibration.is_some(),
        sha256: format!("{:x}", Sha256::digest(&bytes)),
        loaded_at: chrono::Utc::now(),
    };

    LogisticModel::from_artifact(artifact, metadata)
}
