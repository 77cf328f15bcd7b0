//! Organization (R4)
//!
//! `OrganizationContact` is reused by the R5 model, where it stands in for
//! ExtendedContactDetail; members it does not model stay in `additional`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

/// A grouping of people or organizations with a common purpose
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default)]
    pub resource_type: ResourceTag<Organization>,

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

    /// Identifies this organization  across multiple systems
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Whether the organization's record is still in active use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(rename = "_active", skip_serializing_if = "Option::is_none")]
    pub active_ext: Option<Element>,

    /// Kind of organization
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<CodeableConcept>>,

    /// Name used for the organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "_name", skip_serializing_if = "Option::is_none")]
    pub name_ext: Option<Element>,

    /// A list of alternate names that the organization is known as
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Vec<String>>,

    #[serde(rename = "_alias", skip_serializing_if = "Option::is_none")]
    pub alias_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,

    /// The organization of which this organization forms a part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Reference>,

    /// Contact for the organization for a certain purpose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Vec<OrganizationContact>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Vec<Reference>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Organization, "Organization");
crate::impl_domain_resource!(Organization, "Organization", contained = Resource);

crate::model_builder! {
    pub struct OrganizationBuilder => Organization {
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
        add add_type(type_: CodeableConcept);
        set set_name(name: String);
        add add_alias(alias: String);
        add add_telecom(telecom: ContactPoint);
        add add_address(address: Address);
        set set_part_of(part_of: Reference);
        add add_contact(contact: OrganizationContact);
        add add_endpoint(endpoint: Reference);
    }
}

/// Contact for the organization for a certain purpose
///
/// `name` is a single HumanName in R4 and repeating in R5; it is kept in
/// `additional`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// The type of contact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(OrganizationContact, "Organization.contact");
crate::impl_backbone_element!(OrganizationContact);

crate::model_builder! {
    pub struct OrganizationContactBuilder => OrganizationContact {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        set set_purpose(purpose: CodeableConcept);
        add add_telecom(telecom: ContactPoint);
        set set_address(address: Address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_r4_roundtrip() {
        let json = json!({
            "resourceType": "Organization",
            "id": "hl7",
            "name": "Health Level Seven International",
            "alias": ["HL7 International"],
            "_alias": [{"id": "a1"}],
            "telecom": [{"system": "phone", "value": "(+1) 734-677-7777"}],
            "address": [{"line": ["3300 Washtenaw Avenue, Suite 227"], "city": "Ann Arbor"}],
            "contact": [{
                "purpose": {"text": "press"},
                "name": {"text": "Press Office"}
            }]
        });
        let organization = Organization::from_json(&json).unwrap();

        assert_eq!(organization.alias_ext.as_ref().unwrap()[0].as_ref().unwrap().id.as_deref(), Some("a1"));
        let contact = &organization.contact.as_ref().unwrap()[0];
        assert!(contact.additional.contains_key("name"));
        assert_eq!(organization.to_json().unwrap(), json);
    }

    #[test]
    fn test_r5_contact_roundtrip() {
        let json = json!({
            "resourceType": "Organization",
            "name": "Burgers University Medical Center",
            "contact": [{
                "name": [{"text": "Reception"}],
                "telecom": [{"system": "phone", "value": "022-655 2300"}],
                "address": {"city": "Den Burg"}
            }],
            "qualification": [{"code": {"text": "accredited"}}]
        });
        let organization = Organization::from_json(&json).unwrap();

        assert!(organization.additional.contains_key("qualification"));
        assert_eq!(organization.to_json().unwrap(), json);
    }

    #[test]
    fn test_builder() {
        let organization = OrganizationBuilder::default()
            .set_name("Acme Clinic")
            .add_alias("Acme")
            .add_type(CodeableConcept::from_text("prov"))
            .build();

        let json = organization.to_json().unwrap();
        assert_eq!(json["type"][0]["text"], "prov");
        assert_eq!(json["alias"], json!(["Acme"]));
    }
}
