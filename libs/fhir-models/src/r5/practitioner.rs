//! Practitioner (R5)
//!
//! Adds `deceased[x]`. The R5 `communication` backbone is kept in
//! `additional`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;
use crate::r4::AdministrativeGender;

pub use crate::r4::{PractitionerQualification, PractitionerQualificationBuilder};

crate::choice_type! {
    /// Practitioner.deceased[x]
    pub enum PractitionerDeceased("deceased") {
        Boolean(Primitive<bool>),
        DateTime(Primitive<String>),
    }
}

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

    /// Indicates if the practitioner is deceased or not
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub deceased: Option<PractitionerDeceased>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<Attachment>>,

    /// Certification, licenses, or training pertaining to the provision of care
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<Vec<PractitionerQualification>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Practitioner, "Practitioner", choices = [PractitionerDeceased]);
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
        set set_deceased(deceased: PractitionerDeceased);
        add add_photo(photo: Attachment);
        add add_qualification(qualification: PractitionerQualification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip_with_deceased() {
        let json = json!({
            "resourceType": "Practitioner",
            "id": "retired",
            "active": false,
            "name": [{"family": "Careful", "given": ["Adam"]}],
            "deceasedDateTime": "2020-04-01",
            "communication": [{"language": {"text": "Dutch"}, "preferred": true}],
            "qualification": [{"code": {"text": "MD"}}]
        });
        let practitioner = Practitioner::from_json(&json).unwrap();

        assert!(matches!(practitioner.deceased, Some(PractitionerDeceased::DateTime(_))));
        assert!(practitioner.additional.contains_key("communication"));
        assert_eq!(practitioner.to_json().unwrap(), json);
    }

    #[test]
    fn test_contained_typed_by_r5_union() {
        let json = json!({
            "resourceType": "Practitioner",
            "contained": [{
                "resourceType": "Condition",
                "id": "c1",
                "clinicalStatus": {"text": "active"},
                "subject": {"reference": "Patient/1"}
            }]
        });
        let practitioner = Practitioner::from_json(&json).unwrap();
        assert!(matches!(practitioner.contained.as_deref().unwrap()[0], Resource::Condition(_)));
        assert_eq!(practitioner.to_json().unwrap(), json);
    }
}
