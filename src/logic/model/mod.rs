//! Model Module - classifier loading and inference
//!
//! The scorer only sees the [`Classifier`] trait, so the artifact format can
//! change without touching request handling.

pub mod inference;
pub mod logistic;
pub mod threshold;

// Re-export common types
pub use inference::{Classifier, InferenceError, ModelMetadata};
pub use logistic::{load_classifier, LogisticModel, ModelLoadError};
pub use threshold::RiskThresholds;
