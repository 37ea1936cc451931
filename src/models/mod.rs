//! Data models

pub mod vitals;
pub mod assessment;

pub use vitals::*;
pub use assessment::*;
