//! FHIR R4B (4.3.0) resources
//!
//! The resources modeled here did not change between R4 and R4B, so this
//! module re-exports [`crate::r4`], including its `Resource` union and
//! `Bundle`. The shared union reports `ResourceUnion::RELEASE` as R4; callers
//! that work on behalf of an R4B request label errors and logs with the
//! release they were asked for.

pub use crate::r4::*;
