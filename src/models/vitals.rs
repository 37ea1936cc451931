//! Vital-sign model

use serde::Serialize;
use validator::Validate;

/// The seven measurements a client may send to `/predict`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VitalField {
    Glucose,
    Diastolic,
    SkinThickness,
    Insulin,
    Bmi,
    Age,
    Gender,
}

impl VitalField {
    pub const ALL: [VitalField; 7] = [
        VitalField::Glucose,
        VitalField::Diastolic,
        VitalField::SkinThickness,
        VitalField::Insulin,
        VitalField::Bmi,
        VitalField::Age,
        VitalField::Gender,
    ];

    /// JSON key as sent by the client
    pub fn key(self) -> &'static str {
        match self {
            VitalField::Glucose => "glucose",
            VitalField::Diastolic => "diastolic",
            VitalField::SkinThickness => "skinThickness",
            VitalField::Insulin => "insulin",
            VitalField::Bmi => "bmi",
            VitalField::Age => "age",
            VitalField::Gender => "gender",
        }
    }

    /// Struct field name, as reported by `validator`
    pub fn ident(self) -> &'static str {
        match self {
            VitalField::SkinThickness => "skin_thickness",
            other => other.key(),
        }
    }
}

/// Vital signs after numeric coercion.
///
/// Range bounds are inclusive. `None` means the client did not send the
/// field (or sent `null`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    #[validate(range(min = 0.0, max = 1000.0))]
    pub glucose: Option<f64>,

    #[validate(range(min = 0.0, max = 300.0))]
    pub diastolic: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub skin_thickness: Option<f64>,

    #[validate(range(min = 0.0, max = 2000.0))]
    pub insulin: Option<f64>,

    #[validate(range(min = 0.0, max = 200.0))]
    pub bmi: Option<f64>,

    #[validate(range(min = 0.0, max = 130.0))]
    pub age: Option<f64>,

    /// 0 = female, 1 = male
    #[validate(range(min = 0.0, max = 1.0))]
    pub gender: Option<f64>,
}

impl VitalSigns {
    pub fn get(&self, field: VitalField) -> Option<f64> {
        match field {
            VitalField::Glucose => self.glucose,
            VitalField::Diastolic => self.diastolic,
            VitalField::SkinThickness => self.skin_thickness,
            VitalField::Insulin => self.insulin,
            VitalField::Bmi => self.bmi,
            VitalField::Age => self.age,
            VitalField::Gender => self.gender,
        }
    }

    pub fn set(&mut self, field: VitalField, value: Option<f64>) {
        let slot = match field {
            VitalField::Glucose => &mut self.glucose,
            VitalField::Diastolic => &mut self.diastolic,
            VitalField::SkinThickness => &mut self.skin_thickness,
            VitalField::Insulin => &mut self.insulin,
            VitalField::Bmi => &mut self.bmi,
            VitalField::Age => &mut self.age,
            VitalField::Gender => &mut self.gender,
        };
        *slot = value;
    }
}

/// Vital signs that passed the trust boundary.
///
/// Only [`crate::logic::validation::validate`] builds this, so every present
/// value is finite and inside its range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedFields(VitalSigns);

impl ValidatedFields {
    pub(crate) fn new(vitals: VitalSigns) -> Self {
        Self(vitals)
    }

    pub fn get(&self, field: VitalField) -> Option<f64> {
        self.0.get(field)
    }

    /// Number of fields the client actually supplied
    pub fn present_count(&self) -> usize {
        VitalField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }
}
