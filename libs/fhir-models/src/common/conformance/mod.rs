//! Conformance resources consumed by the code generator

pub mod element_definition;
pub mod structure_definition;

pub use element_definition::*;
pub use structure_definition::*;
