//! Request pipeline: validation, feature construction, scoring

pub mod features;
pub mod model;
pub mod scoring;
pub mod validation;
