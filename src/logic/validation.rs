//! Payload Validator
//!
//! Turns an untrusted JSON body into [`ValidatedFields`]. Nothing here
//! substitutes defaults: an absent field stays absent and the scorer decides
//! what to feed the classifier.

use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::models::{ValidatedFields, VitalField, VitalSigns};

/// Ceiling on top-level keys, recognized or not
pub const MAX_FIELDS: usize = 20;

/// Whether absent vital signs are accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Every field optional, scorer defaults fill the gaps
    #[default]
    Lenient,
    /// All seven fields must be present and non-null
    Strict,
}

impl std::str::FromStr for FieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" | "optional" => Ok(FieldPolicy::Lenient),
            "strict" | "required" => Ok(FieldPolicy::Strict),
            other => Err(format!("unknown field policy: {}", other)),
        }
    }
}

/// Why a recognized field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    NotNumeric,
    NonFinite,
    OutOfRange,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            InvalidReason::NotNumeric => "not numeric",
            InvalidReason::NonFinite => "not finite",
            InvalidReason::OutOfRange => "out of range",
        };
        f.write_str(text)
    }
}

/// Validation failures. The `Display` text is for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request body is not a JSON object")]
    MalformedInput,

    #[error("payload has {count} fields, limit is {}", MAX_FIELDS)]
    TooManyFields { count: usize },

    #[error("field `{field}` rejected: {reason}")]
    InvalidField {
        field: &'static str,
        reason: InvalidReason,
    },

    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
}

/// Validate a raw request body.
pub fn validate(raw: &Value, policy: FieldPolicy) -> Result<ValidatedFields, ValidationError> {
    let object = raw.as_object().ok_or(ValidationError::MalformedInput)?;

    if object.len() > MAX_FIELDS {
        return Err(ValidationError::TooManyFields {
            count: object.len(),
        });
    }

    let mut vitals = VitalSigns::default();

    for field in VitalField::ALL {
        let value = match object.get(field.key()) {
            None | Some(Value::Null) => {
                if policy == FieldPolicy::Strict {
                    return Err(ValidationError::MissingField(field.key()));
                }
                None
            }
            Some(raw_value) => Some(coerce(raw_value).map_err(|reason| {
                ValidationError::InvalidField {
                    field: field.key(),
                    reason,
                }
            })?),
        };
        vitals.set(field, value);
    }

    vitals.validate().map_err(|errors| {
        let failed: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        let field = VitalField::ALL
            .into_iter()
            .find(|f| failed.iter().any(|name| name == f.ident()))
            .map(VitalField::key)
            .unwrap_or("unknown");
        ValidationError::InvalidField {
            field,
            reason: InvalidReason::OutOfRange,
        }
    })?;

    Ok(ValidatedFields::new(vitals))
}

/// Numbers pass through, numeric strings are parsed, anything else fails.
fn coerce(value: &Value) -> Result<f64, InvalidReason> {
    let number = match value {
        Value::Number(n) => n.as_f64().ok_or(InvalidReason::NotNumeric)?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| InvalidReason::NotNumeric)?,
        _ => return Err(InvalidReason::NotNumeric),
    };

    if !number.is_finite() {
        return Err(InvalidReason::NonFinite);
    }

    Ok(number)
}
