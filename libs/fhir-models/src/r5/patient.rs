//! Patient (R5)
//!
//! Same members as R4; `contained` resources are typed by the R5 union.
//! Backbone elements and code enums are shared with [`crate::r4`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

pub use crate::r4::{
    AdministrativeGender, LinkType, PatientCommunication, PatientCommunicationBuilder,
    PatientContact, PatientContactBuilder, PatientDeceased, PatientLink, PatientLinkBuilder,
    PatientMultipleBirth,
};

/// Demographics and other administrative information about an individual receiving care
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default)]
    pub resource_type: ResourceTag<Patient>,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Metadata about the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// A set of rules under which this content was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_rules: Option<String>,

    #[serde(rename = "_implicitRules", skip_serializing_if = "Option::is_none")]
    pub implicit_rules_ext: Option<Element>,

    /// Language of the resource content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "_language", skip_serializing_if = "Option::is_none")]
    pub language_ext: Option<Element>,

    /// Text summary of the resource, for human interpretation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,

    /// Contained, inline Resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contained: Option<Vec<Resource>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// An identifier for this patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Whether this patient's record is in active use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(rename = "_active", skip_serializing_if = "Option::is_none")]
    pub active_ext: Option<Element>,

    /// A name associated with the patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<HumanName>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,

    /// male | female | other | unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<AdministrativeGender>,

    #[serde(rename = "_gender", skip_serializing_if = "Option::is_none")]
    pub gender_ext: Option<Element>,

    /// The date of birth for the individual
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(rename = "_birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date_ext: Option<Element>,

    /// Indicates if the individual is deceased or not
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub deceased: Option<PatientDeceased>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,

    /// Whether patient is part of a multiple birth
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub multiple_birth: Option<PatientMultipleBirth>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<Attachment>>,

    /// A contact party (e.g. guardian, partner, friend) for the patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Vec<PatientContact>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<Vec<PatientCommunication>>,

    /// Patient's nominated primary care provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_practitioner: Option<Vec<Reference>>,

    /// Organization that is the custodian of the patient record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Reference>,

    /// Link to another patient resource that concerns the same actual person
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<PatientLink>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Patient, "Patient", choices = [PatientDeceased, PatientMultipleBirth]);
crate::impl_domain_resource!(Patient, "Patient", contained = Resource);

crate::model_builder! {
    pub struct PatientBuilder => Patient {
        set set_id(id: String);
        set set_meta(meta: Meta);
        set set_implicit_rules(implicit_rules: String);
        set set_language(language: String);
        set set_text(text: Narrative);
        add add_contained(contained: Resource);
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_identifier(identifier: Identifier);
        set set_active(active: bool);
        add add_name(name: HumanName);
        add add_telecom(telecom: ContactPoint);
        set set_gender(gender: AdministrativeGender);
        set set_birth_date(birth_date: String);
        set set_deceased(deceased: PatientDeceased);
        add add_address(address: Address);
        set set_marital_status(marital_status: CodeableConcept);
        set set_multiple_birth(multiple_birth: PatientMultipleBirth);
        add add_photo(photo: Attachment);
        add add_contact(contact: PatientContact);
        add add_communication(communication: PatientCommunication);
        add add_general_practitioner(general_practitioner: Reference);
        set set_managing_organization(managing_organization: Reference);
        add add_link(link: PatientLink);
    }
}

impl Patient {
    /// Display form of the first `official` name, falling back to the first name
    pub fn display_name(&self) -> Option<String> {
        let names = self.name.as_deref().unwrap_or(&[]);
        names
            .iter()
            .find(|n| n.use_ == Some(NameUse::Official))
            .or_else(|| names.first())
            .map(HumanName::display)
    }

    pub fn is_deceased(&self) -> bool {
        match &self.deceased {
            Some(PatientDeceased::Boolean(flag)) => flag.value == Some(true),
            Some(PatientDeceased::DateTime(_)) => true,
            None => false,
        }
    }
}
