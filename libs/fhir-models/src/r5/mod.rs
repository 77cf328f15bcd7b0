//! FHIR R5 (5.0.0) resources
//!
//! Every resource here has its own top-level model so that `contained`
//! resources are typed by the R5 union. Backbone elements and code enums that
//! did not change are shared with [`crate::r4`] and re-exported.

mod condition;
mod medication_request;
mod observation;
mod operation_outcome;
mod organization;
mod patient;
mod practitioner;

pub use condition::*;
pub use medication_request::*;
pub use observation::*;
pub use operation_outcome::*;
pub use organization::*;
pub use patient::*;
pub use practitioner::*;

use crate::common::bundle;

crate::resource_union! {
    /// Any R5 resource
    pub enum Resource for R5 {
        Bundle(Bundle),
        Condition(Condition),
        MedicationRequest(MedicationRequest),
        Observation(Observation),
        OperationOutcome(OperationOutcome),
        Organization(Organization),
        Patient(Patient),
        Practitioner(Practitioner),
    }
}

pub type Bundle = bundle::Bundle<Resource>;
pub type BundleBuilder = bundle::BundleBuilder<Resource>;
pub type BundleEntry = bundle::BundleEntry<Resource>;
pub type BundleEntryResponse = bundle::BundleEntryResponse<Resource>;
