//! Datatypes shared by R4, R4B and R5
//!
//! Members whose shape changed between releases are left to each type's
//! `additional` map so the same struct round-trips content from every release.

mod contact;
mod element;
mod general;
mod timing;

pub use contact::*;
pub use element::*;
pub use general::*;
pub use timing::*;

crate::complex_choice_value!(
    Address,
    Annotation,
    Attachment,
    CodeableConcept,
    CodeableReference,
    Coding,
    ContactDetail,
    ContactPoint,
    Dosage,
    HumanName,
    Identifier,
    Meta,
    Money,
    Period,
    Quantity,
    Range,
    Ratio,
    Reference,
    SampledData,
    Signature,
    Timing,
    UsageContext,
);

