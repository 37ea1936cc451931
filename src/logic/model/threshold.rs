//! Risk tier thresholds
//!
//! Comparisons are strict: a probability sitting exactly on a boundary
//! falls into the lower tier.

use serde::{Deserialize, Serialize};

use crate::models::RiskLabel;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Above this the label is High
    pub high: f64,

    /// Above this (and not High) the label is Medium
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, probability: f64) -> RiskLabel {
        if probability > self.high {
            RiskLabel::High
        } else if probability > self.medium {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        }
    }
}
