//! Version-agnostic FHIR models and machinery
//!
//! Types that work across FHIR R4, R4B, and R5

pub mod builder;
pub mod bundle;
pub mod choice;
pub mod conformance;
pub mod datatypes;
pub mod decimal;
pub mod error;
pub mod model;
pub mod primitive;
pub mod resource;
pub mod validate;
pub mod version;

// Re-export commonly used types
pub use bundle::*;
pub use decimal::Decimal;
pub use error::{Error, Result};
pub use primitive::Primitive;
pub use version::FhirVersion;
