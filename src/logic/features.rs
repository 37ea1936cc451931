//! Feature Vector Builder
//!
//! Maps validated vitals into the column order the classifier was trained
//! on. Pregnancies and pedigree are not collected by the client and always
//! carry fixed values.

use serde::Serialize;

use crate::models::{ValidatedFields, VitalField};

/// Number of classifier inputs
pub const FEATURE_COUNT: usize = 8;

/// Training column names, in vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

pub const PREGNANCIES_ESTIMATE: f64 = 0.0;
pub const PEDIGREE_ESTIMATE: f64 = 0.5;

/// Used when `skinThickness` is absent
pub const DEFAULT_SKIN_THICKNESS: f64 = 20.0;

/// Used for every other absent vital
pub const DEFAULT_VITAL: f64 = 0.0;

/// Fixed-order classifier input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Build the vector, substituting defaults for absent vitals.
    pub fn from_fields(fields: &ValidatedFields) -> Self {
        let vital = |field: VitalField| {
            let default = match field {
                VitalField::SkinThickness => DEFAULT_SKIN_THICKNESS,
                _ => DEFAULT_VITAL,
            };
            fields.get(field).unwrap_or(default)
        };

        Self([
            PREGNANCIES_ESTIMATE,
            vital(VitalField::Glucose),
            vital(VitalField::Diastolic),
            vital(VitalField::SkinThickness),
            vital(VitalField::Insulin),
            vital(VitalField::Bmi),
            PEDIGREE_ESTIMATE,
            vital(VitalField::Age),
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
