//! FHIR data models
//!
//! Strongly-typed Rust structures for FHIR R4, R4B and R5 resources and
//! datatypes, with fluent builders and a validation hook.
//!
//! # Module Organization
//!
//! - `common`: version-agnostic machinery (model traits, choice types,
//!   builders, datatypes, Bundle, conformance models)
//! - `r4`, `r4b`, `r5`: resources of each release and its `Resource` union
//!
//! # Example
//!
//! ```rust
//! use fhirbind_models::prelude::*;
//! use fhirbind_models::r4::{ObservationBuilder, ObservationStatus, ObservationValue};
//!
//! let observation = ObservationBuilder::new(
//!     ObservationStatus::Final,
//!     Coding::new("http://loinc.org", "8867-4"),
//! )
//! .set_subject(Reference::to("Patient/example"))
//! .set_value(ObservationValue::Quantity(Quantity::ucum(Decimal::new(725, 1), "/min")))
//! .build();
//!
//! let json = observation.to_json().unwrap();
//! assert_eq!(json["resourceType"], "Observation");
//! assert_eq!(json["valueQuantity"]["value"], 72.5);
//! ```

pub mod common;
pub mod r4;
pub mod r4b;
pub mod r5;

// Re-export commonly used types
pub use common::*;

/// Everything needed to work with models and builders
pub mod prelude {
    pub use crate::common::builder::ModelBuilder;
    pub use crate::common::bundle::{
        Bundle, BundleBuilder, BundleEntry, BundleEntryRequest, BundleType, HttpVerb,
    };
    pub use crate::common::choice::{ChoiceGroup, ChoiceType};
    pub use crate::common::datatypes::*;
    pub use crate::common::decimal::Decimal;
    pub use crate::common::error::Error;
    pub use crate::common::model::{
        BackboneElementBase, DomainResourceBase, ElementBase, FhirModel, HasExtensions,
        HasModifierExtensions, ResourceBase, ResourceTag,
    };
    pub use crate::common::primitive::Primitive;
    pub use crate::common::resource::ResourceUnion;
    pub use crate::common::validate::{
        FnValidator, NoopValidator, ResourceValidator, ValidationFailure, ValidationIssue,
    };
    pub use crate::common::version::FhirVersion;
}

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}
