//! Risk Scorer
//!
//! Feature vector -> classifier -> gender adjustment -> clamp -> label.
//! Inference problems never surface as errors: they resolve to the neutral
//! probability on an explicit, logged branch.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use super::features::FeatureVector;
use super::model::{Classifier, RiskThresholds};
use crate::models::{FallbackReason, RiskAssessment, ScoreSource, ValidatedFields, VitalField};

/// Probability reported when the classifier cannot be used
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Applied to the model output for male patients (training set was all female)
pub const MALE_DAMPENING_FACTOR: f64 = 0.9;

const MALE: f64 = 1.0;

#[derive(Clone)]
pub struct RiskScorer {
    classifier: Option<Arc<dyn Classifier>>,
    thresholds: RiskThresholds,
}

impl RiskScorer {
    pub fn new(classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self {
            classifier,
            thresholds: RiskThresholds::default(),
        }
    }

    /// Scorer with no classifier; every request gets the neutral probability
    pub fn degraded() -> Self {
        Self::new(None)
    }

    pub fn is_degraded(&self) -> bool {
        self.classifier.is_none()
    }

    pub fn score(&self, fields: &ValidatedFields) -> RiskAssessment {
        let features = FeatureVector::from_fields(fields);

        let (probability, source) = match self.model_probability(&features) {
            Ok(raw) => (raw * gender_factor(fields), ScoreSource::Model),
            Err(reason) => (NEUTRAL_PROBABILITY, ScoreSource::Fallback(reason)),
        };
        let probability = probability.clamp(0.0, 1.0);

        RiskAssessment {
            risk: self.thresholds.classify(probability),
            probability,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            source,
        }
    }

    fn model_probability(&self, features: &FeatureVector) -> Result<f64, FallbackReason> {
        let Some(classifier) = self.classifier.as_deref() else {
            tracing::debug!("No classifier loaded, using neutral probability");
            return Err(FallbackReason::ModelUnavailable);
        };

        let positive = match classifier.predict_proba(features) {
            Ok([_, positive]) => positive,
            Err(e) => {
                tracing::warn!(
                    model = %classifier.metadata().name,
                    "Inference failed ({}), using neutral probability",
                    e
                );
                return Err(FallbackReason::InferenceFailed);
            }
        };

        if !positive.is_finite() {
            tracing::warn!(
                model = %classifier.metadata().name,
                "Classifier returned non-finite probability, using neutral probability"
            );
            return Err(FallbackReason::NonFiniteOutput);
        }

        Ok(positive)
    }
}

fn gender_factor(fields: &ValidatedFields) -> f64 {
    if fields.get(VitalField::Gender) == Some(MALE) {
        MALE_DAMPENING_FACTOR
    } else {
        1.0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logic::model::{load_classifier, InferenceError, ModelMetadata};
    use crate::logic::validation::{validate, FieldPolicy};
    use crate::models::RiskLabel;
    use serde_json::{json, Value};
    use std::path::Path;

    /// Classifier double returning a fixed positive probability
    pub(crate) struct FixedClassifier {
        pub positive: f64,
        metadata: ModelMetadata,
    }

    impl FixedClassifier {
        pub(crate) fn new(positive: f64) -> Self {
            Self {
                positive,
                metadata: ModelMetadata {
                    name: "fixed".to_string(),
                    model_path: "<memory>".to_string(),
                    model_type: "fixed".to_string(),
                    features: crate::logic::features::FEATURE_COUNT,
                    calibrated: false,
                    sha256: String::new(),
                    loaded_at: Utc::now(),
                },
            }
        }
    }

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
            Ok([1.0 - self.positive, self.positive])
        }

        fn metadata(&self) -> &ModelMetadata {
            &self.metadata
        }
    }

    struct FailingClassifier(ModelMetadata);

    impl Classifier for FailingClassifier {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
            Err(InferenceError::Backend("session poisoned".to_string()))
        }

        fn metadata(&self) -> &ModelMetadata {
            &self.0
        }
    }

    fn fixed(positive: f64) -> RiskScorer {
        RiskScorer::new(Some(Arc::new(FixedClassifier::new(positive))))
    }

    fn bundled() -> RiskScorer {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::config::DEFAULT_MODEL_PATH);
        let model = load_classifier(&path).unwrap();
        RiskScorer::new(Some(Arc::new(model)))
    }

    fn fields(payload: Value) -> ValidatedFields {
        validate(&payload, FieldPolicy::Lenient).unwrap()
    }

    #[test]
    fn test_degraded_mode_is_neutral() {
        let scorer = RiskScorer::degraded();
        assert!(scorer.is_degraded());

        for payload in [json!({}), json!({ "glucose": 200, "gender": 1 })] {
            let assessment = scorer.score(&fields(payload));
            assert_eq!(assessment.probability, 0.5);
            assert_eq!(assessment.risk, RiskLabel::Medium);
            assert_eq!(
                assessment.source,
                ScoreSource::Fallback(FallbackReason::ModelUnavailable)
            );
        }
    }

    #[test]
    fn test_inference_error_falls_back() {
        let meta = FixedClassifier::new(0.0).metadata;
        let scorer = RiskScorer::new(Some(Arc::new(FailingClassifier(meta))));
        let assessment = scorer.score(&fields(json!({ "glucose": 120 })));
        assert_eq!(assessment.probability, 0.5);
        assert_eq!(
            assessment.source,
            ScoreSource::Fallback(FallbackReason::InferenceFailed)
        );
    }

    #[test]
    fn test_non_finite_output_falls_back() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let assessment = fixed(bad).score(&fields(json!({})));
            assert_eq!(assessment.probability, 0.5);
            assert_eq!(
                assessment.source,
                ScoreSource::Fallback(FallbackReason::NonFiniteOutput)
            );
        }
    }

    #[test]
    fn test_output_is_clamped() {
        assert_eq!(fixed(1.7).score(&fields(json!({}))).probability, 1.0);
        assert_eq!(fixed(-0.3).score(&fields(json!({}))).probability, 0.0);
    }

    #[test]
    fn test_male_dampening() {
        let scorer = fixed(0.8);
        let female = scorer.score(&fields(json!({ "glucose": 150, "gender": 0 })));
        let male = scorer.score(&fields(json!({ "glucose": 150, "gender": 1 })));
        let unknown = scorer.score(&fields(json!({ "glucose": 150 })));
        let fractional = scorer.score(&fields(json!({ "glucose": 150, "gender": 0.5 })));

        assert_eq!(female.probability, 0.8);
        assert!((male.probability - 0.72).abs() < 1e-12);
        assert_eq!(unknown.probability, 0.8);
        assert_eq!(fractional.probability, 0.8);
        assert_eq!(female.risk, RiskLabel::High);
        assert_eq!(male.risk, RiskLabel::High);
    }

    #[test]
    fn test_dampening_can_lower_tier() {
        // 0.75 * 0.9 = 0.675
        let male = fixed(0.75).score(&fields(json!({ "gender": "1" })));
        assert_eq!(male.risk, RiskLabel::Medium);
    }

    #[test]
    fn test_bundled_model_healthy_profile() {
        let assessment = bundled().score(&fields(json!({
            "glucose": 85, "bmi": 22.0, "age": 25, "gender": 0,
            "insulin": 80, "skinThickness": 20, "diastolic": 70
        })));
        assert_eq!(assessment.source, ScoreSource::Model);
        assert!(assessment.probability < 0.6);
        assert!(matches!(assessment.risk, RiskLabel::Low | RiskLabel::Medium));
    }

    #[test]
    fn test_bundled_model_elevated_profile() {
        let assessment = bundled().score(&fields(json!({
            "glucose": 200, "bmi": 40.0, "age": 60, "gender": 1
        })));
        assert_eq!(assessment.source, ScoreSource::Model);
        assert!(assessment.probability > 0.5);
    }

    #[test]
    fn test_bundled_model_gender_ratio() {
        let scorer = bundled();
        let base = json!({ "glucose": 140, "bmi": 33, "age": 45, "diastolic": 80 });

        let mut female = base.clone();
        female["gender"] = json!(0);
        let mut male = base;
        male["gender"] = json!(1);

        let pf = scorer.score(&fields(female)).probability;
        let pm = scorer.score(&fields(male)).probability;
        assert!(pm <= pf);
        assert!((pm - pf * 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_idempotent() {
        let scorer = bundled();
        let input = fields(json!({ "glucose": 130, "bmi": 28.5, "age": 50 }));
        let a = scorer.score(&input);
        let b = scorer.score(&input);
        assert_eq!(a.probability, b.probability);
        assert_eq!(a.risk, b.risk);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let assessment = RiskScorer::degraded().score(&fields(json!({})));
        assert!(chrono::DateTime::parse_from_rfc3339(&assessment.timestamp).is_ok());
    }
}
