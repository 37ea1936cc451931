//! Configuration module

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::logic::validation::FieldPolicy;

/// Default classifier artifact, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "models/diabetes_model.json";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Path to the serialized classifier artifact
    pub model_path: PathBuf,

    /// Whether the seven vital-sign fields are required or optional
    pub field_policy: FieldPolicy,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            field_policy: FieldPolicy::default(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Values that fail to parse keep their default and produce a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),

            model_path: lookup("MODEL_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            field_policy: parse_or(&lookup, "FIELD_POLICY", defaults.field_policy),

            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}={:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 5000);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.field_policy, FieldPolicy::Lenient);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8081"),
            ("MODEL_PATH", "/srv/model.json"),
            ("FIELD_POLICY", "strict"),
            ("ENVIRONMENT", "production"),
        ]));
        assert_eq!(config.port, 8081);
        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.field_policy, FieldPolicy::Strict);
        assert!(config.is_production());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("FIELD_POLICY", "sometimes"),
            ("MODEL_PATH", "  "),
        ]));
        assert_eq!(config.port, 5000);
        assert_eq!(config.field_policy, FieldPolicy::Lenient);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }
}
