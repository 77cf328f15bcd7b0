//! Practitioner (R4)
//!
//! `PractitionerQualification` is reused by the R5 model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use super::AdministrativeGender;
use crate::prelude::*;

/// A person with a  formal responsibility in the provisioning of healthcare or related services
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    #[serde(default)]
    pub resource_type: ResourceTag<Practitioner>,

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

    /// An identifier for the person as this agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Whether this practitioner's record is in active use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(rename = "_active", skip_serializing_if = "Option::is_none")]
    pub active_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<HumanName>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<AdministrativeGender>,

    #[serde(rename = "_gender", skip_serializing_if = "Option::is_none")]
    pub gender_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(rename = "_birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<Attachment>>,

    /// Certification, licenses, or training pertaining to the provision of care
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<Vec<PractitionerQualification>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Practitioner, "Practitioner");
crate::impl_domain_resource!(Practitioner, "Practitioner", contained = Resource);

crate::model_builder! {
    pub struct PractitionerBuilder => Practitioner {
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
        add add_address(address: Address);
        set set_gender(gender: AdministrativeGender);
        set set_birth_date(birth_date: String);
        add add_photo(photo: Attachment);
        add add_qualification(qualification: PractitionerQualification);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PractitionerQualification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Coded representation of the qualification
    pub code: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    /// Organization that regulates and issues the qualification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Reference>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl PractitionerQualification {
    pub fn new(code: impl Into<CodeableConcept>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(PractitionerQualification, "Practitioner.qualification");
crate::impl_backbone_element!(PractitionerQualification);

crate::model_builder! {
    pub struct PractitionerQualificationBuilder => PractitionerQualification {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_identifier(identifier: Identifier);
        req set_code(code: CodeableConcept);
        set set_period(period: Period);
        set set_issuer(issuer: Reference);
    }
}

impl PractitionerQualificationBuilder {
    pub fn new(code: impl Into<CodeableConcept>) -> Self {
        Self::from(PractitionerQualification::new(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip() {
        let json = json!({
            "resourceType": "Practitioner",
            "id": "example",
            "identifier": [{"system": "http://www.acme.org/practitioners", "value": "23"}],
            "active": true,
            "name": [{"family": "Careful", "given": ["Adam"], "prefix": ["Dr"]}],
            "gender": "male",
            "qualification": [{
                "code": {"text": "Bachelor of Science"},
                "period": {"start": "1995"},
                "issuer": {"display": "Example University"}
            }]
        });
        let practitioner = Practitioner::from_json(&json).unwrap();

        assert_eq!(practitioner.name.as_ref().unwrap()[0].display(), "Dr Adam Careful");
        assert_eq!(practitioner.local_reference().as_deref(), Some("Practitioner/example"));
        assert_eq!(practitioner.to_json().unwrap(), json);
    }

    #[test]
    fn test_r5_members_preserved() {
        let json = json!({
            "resourceType": "Practitioner",
            "deceasedBoolean": false,
            "communication": [{"language": {"text": "English"}, "preferred": true}]
        });
        let practitioner = Practitioner::from_json(&json).unwrap();

        assert!(practitioner.additional.contains_key("communication"));
        assert_eq!(practitioner.to_json().unwrap(), json);
    }

    #[test]
    fn test_builder_qualification() {
        let practitioner = PractitionerBuilder::default()
            .add_name(HumanName::new("Nightingale", "Florence"))
            .add_qualification(
                PractitionerQualificationBuilder::new(CodeableConcept::from_text("RN"))
                    .set_issuer(Reference::to("Organization/nursing-board"))
                    .build(),
            )
            .build();

        let json = practitioner.to_json().unwrap();
        assert_eq!(json["qualification"][0]["code"]["text"], "RN");
    }
}
