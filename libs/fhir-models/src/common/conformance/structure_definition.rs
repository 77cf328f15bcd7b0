//! FHIR StructureDefinition model
//!
//! Enough of StructureDefinition to drive code generation: identity, kind,
//! base type and the element lists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::element_definition::{Differential, ElementDefinition, Snapshot};
use crate::common::datatypes::Meta;
use crate::common::model::ResourceTag;
use crate::common::version::FhirVersion;

/// FHIR StructureDefinition resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructureDefinition {
    #[serde(default)]
    pub resource_type: ResourceTag<StructureDefinition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Canonical identifier for this structure definition
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Computer-friendly name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// draft | active | retired | unknown
    pub status: PublicationStatus,

    /// Natural language description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// FHIR release this definition targets (e.g. "4.0.1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_version: Option<String>,

    /// primitive-type | complex-type | resource | logical
    pub kind: StructureDefinitionKind,

    /// Whether the structure is abstract
    #[serde(rename = "abstract")]
    pub is_abstract: bool,

    /// Type defined or constrained by this structure
    #[serde(rename = "type")]
    pub type_: String,

    /// Definition that this type is constrained/specialized from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_definition: Option<String>,

    /// specialization | constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivation: Option<TypeDerivationRule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub differential: Option<Differential>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(StructureDefinition, "StructureDefinition");
crate::impl_resource!(StructureDefinition, "StructureDefinition");

/// Publication status of a conformance resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Active,
    Retired,
    Unknown,
}

/// Kind of structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureDefinitionKind {
    PrimitiveType,
    #[default]
    ComplexType,
    Resource,
    Logical,
}

/// How a type relates to its base definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDerivationRule {
    Specialization,
    Constraint,
}

impl StructureDefinition {
    /// Base type name from `baseDefinition` (`DomainResource` for Patient)
    pub fn base_type(&self) -> Option<&str> {
        self.base_definition
            .as_deref()
            .map(|url| url.rsplit('/').next().unwrap_or(url))
    }

    /// Profiles constrain an existing type instead of defining a new one
    pub fn is_profile(&self) -> bool {
        self.derivation == Some(TypeDerivationRule::Constraint)
    }

    pub fn is_resource(&self) -> bool {
        self.kind == StructureDefinitionKind::Resource
    }

    /// Release this definition targets, when `fhirVersion` is recognized
    pub fn release(&self) -> Option<FhirVersion> {
        self.fhir_version
            .as_deref()
            .and_then(FhirVersion::from_release_number)
    }

    /// Snapshot elements, falling back to the differential
    pub fn elements(&self) -> &[ElementDefinition] {
        if let Some(snapshot) = &self.snapshot {
            return &snapshot.element;
        }
        self.differential
            .as_ref()
            .map(|d| d.element.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::model::FhirModel;
    use serde_json::json;

    #[test]
    fn test_parse_structure_definition() {
        let sd_json = json!({
            "resourceType": "StructureDefinition",
            "id": "Patient",
            "url": "http://hl7.org/fhir/StructureDefinition/Patient",
            "version": "4.0.1",
            "name": "Patient",
            "status": "active",
            "fhirVersion": "4.0.1",
            "kind": "resource",
            "abstract": false,
            "type": "Patient",
            "baseDefinition": "http://hl7.org/fhir/StructureDefinition/DomainResource",
            "derivation": "specialization",
            "differential": {"element": [{"path": "Patient"}, {"path": "Patient.active", "min": 0, "max": "1"}]}
        });

        let sd = StructureDefinition::from_json(&sd_json).unwrap();
        assert_eq!(sd.name, "Patient");
        assert_eq!(sd.kind, StructureDefinitionKind::Resource);
        assert_eq!(sd.base_type(), Some("DomainResource"));
        assert_eq!(sd.release(), Some(FhirVersion::R4));
        assert!(!sd.is_profile());
        assert_eq!(sd.elements().len(), 2);
        assert_eq!(sd.to_json().unwrap(), sd_json);
    }

    #[test]
    fn test_rejects_other_resource_types() {
        let result = StructureDefinition::from_json(&json!({
            "resourceType": "ValueSet",
            "url": "http://example.org/vs",
            "name": "Example",
            "status": "draft",
            "kind": "resource",
            "abstract": false,
            "type": "Patient"
        }));
        assert!(result.is_err());
    }
}
