//! Risk assessment model

use serde::Serialize;

/// Three-tier label returned to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    #[serde(rename = "Low Risk (Non-Diabetic)")]
    Low,
    #[serde(rename = "Medium Risk (Pre-Diabetic)")]
    Medium,
    #[serde(rename = "High Risk (Diabetic)")]
    High,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low Risk (Non-Diabetic)",
            RiskLabel::Medium => "Medium Risk (Pre-Diabetic)",
            RiskLabel::High => "High Risk (Diabetic)",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the neutral probability was used instead of a model output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    ModelUnavailable,
    InferenceFailed,
    NonFiniteOutput,
}

/// Where the probability came from. Never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    Model,
    Fallback(FallbackReason),
}

/// Response body of `POST /predict`
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub risk: RiskLabel,
    pub probability: f64,
    pub timestamp: String,
    #[serde(skip)]
    pub source: ScoreSource,
}

impl RiskAssessment {
    pub fn is_degraded(&self) -> bool {
        matches!(self.source, ScoreSource::Fallback(_))
    }
}
