//! Intermediate Representation (IR)
//!
//! Language-agnostic representation of FHIR types extracted from StructureDefinitions.
//! This IR serves as the bridge between FHIR definitions and language-specific code.

use fhirbind_models::FhirVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Registry of all types extracted from a set of StructureDefinitions
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// All types indexed by their canonical URL or name
    types: HashMap<String, TypeDefinition>,
    /// Mapping from type name to canonical identifier
    name_index: HashMap<String, String>,
    /// Release declared by the definitions, when they agree on one
    release: Option<FhirVersion>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type to the registry
    pub fn add_type(&mut self, id: String, type_def: TypeDefinition) {
        self.name_index.insert(type_def.name.clone(), id.clone());
        self.types.insert(id, type_def);
    }

    /// Get a type by its canonical identifier
    pub fn get_type(&self, id: &str) -> Option<&TypeDefinition> {
        self.types.get(id)
    }

    /// Get a type by its name
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDefinition> {
        self.name_index.get(name).and_then(|id| self.types.get(id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn release(&self) -> Option<FhirVersion> {
        self.release
    }

    pub fn set_release(&mut self, release: Option<FhirVersion>) {
        self.release = release;
    }

    /// Iterate over all types
    pub fn types(&self) -> impl Iterator<Item = (&String, &TypeDefinition)> {
        self.types.iter()
    }

    /// Concrete resource types, sorted by name
    pub fn resource_types(&self) -> Vec<&TypeDefinition> {
        self.sorted(|t| t.kind == TypeKind::Resource && !t.is_abstract)
    }

    /// Concrete complex datatypes, sorted by name
    pub fn complex_types(&self) -> Vec<&TypeDefinition> {
        self.sorted(|t| t.kind == TypeKind::ComplexType && !t.is_abstract)
    }

    /// Primitive types, sorted by name
    pub fn primitive_types(&self) -> Vec<&TypeDefinition> {
        self.sorted(|t| t.kind == TypeKind::PrimitiveType)
    }

    fn sorted(&self, keep: impl Fn(&TypeDefinition) -> bool) -> Vec<&TypeDefinition> {
        let mut types: Vec<_> = self.types.values().filter(|t| keep(t)).collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    /// Registry types referenced by `type_def` or its backbone elements,
    /// excluding primitives and the type itself
    pub fn get_dependencies(&self, type_def: &TypeDefinition) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();

        let properties = type_def
            .properties
            .iter()
            .chain(type_def.backbone_elements.iter().flat_map(|b| b.properties.iter()));

        for property in properties {
            for prop_type in &property.types {
                let type_name = &prop_type.code;

                if !is_primitive_type(type_name)
                    && type_name != &type_def.name
                    && type_name != "Resource"
                    && type_name != "Element"
                    && type_name != "BackboneElement"
                    && self.get_type_by_name(type_name).is_some()
                    && !deps.contains(type_name)
                {
                    deps.push(type_name.clone());
                }
            }
        }

        deps.sort();
        deps
    }
}

/// Check if a type is a FHIR primitive
pub fn is_primitive_type(type_name: &str) -> bool {
    matches!(
        type_name,
        "boolean"
            | "integer"
            | "unsignedInt"
            | "positiveInt"
            | "integer64"
            | "decimal"
            | "string"
            | "code"
            | "id"
            | "markdown"
            | "uri"
            | "url"
            | "canonical"
            | "oid"
            | "uuid"
            | "date"
            | "dateTime"
            | "instant"
            | "time"
            | "base64Binary"
            | "xhtml"
    )
}

/// A single type definition extracted from a StructureDefinition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// The type name (e.g., "Patient", "HumanName", "string")
    pub name: String,
    /// Canonical URL if available
    pub url: Option<String>,
    /// Human-readable description
    pub description: Option<String>,
    /// Kind of type (resource, complex-type, primitive)
    pub kind: TypeKind,
    /// Base type this extends (if any)
    pub base_type: Option<String>,
    /// Properties/elements of this type
    pub properties: Vec<Property>,
    /// Whether this is an abstract type
    pub is_abstract: bool,
    /// Backbone elements defined within this type, in document order
    pub backbone_elements: Vec<BackboneElement>,
}

impl TypeDefinition {
    /// Resources deriving directly from `Resource` carry no narrative,
    /// contained resources or extensions (Bundle, Binary, Parameters)
    pub fn is_domain_resource(&self) -> bool {
        self.kind == TypeKind::Resource && self.base_type.as_deref() != Some("Resource")
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Kind of FHIR type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// FHIR Resource (e.g., Patient, Observation)
    Resource,
    /// Complex datatype (e.g., HumanName, Address, Coding)
    ComplexType,
    /// Primitive type (e.g., string, integer, boolean)
    PrimitiveType,
}

/// A property/field within a type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// Property name as written in the definition (`name`, `value[x]`)
    pub name: String,
    /// Path in the FHIR element tree (e.g., "Patient.name")
    pub path: String,
    /// Human-readable description
    pub description: Option<String>,
    /// The type(s) this property can have; more than one only for `[x]`
    pub types: Vec<PropertyType>,
    /// Cardinality
    pub cardinality: Cardinality,
    /// Whether this property is a modifier element
    pub is_modifier: bool,
    /// Struct name of an inline backbone element, for backbone properties
    /// and `contentReference` properties
    pub inline_type: Option<String>,
}

impl Property {
    /// Choice elements are written `name[x]`
    pub fn is_choice(&self) -> bool {
        self.name.ends_with("[x]")
    }

    /// JSON member name, or member prefix for a choice element
    pub fn json_name(&self) -> &str {
        self.name.strip_suffix("[x]").unwrap_or(&self.name)
    }

    pub fn is_required(&self) -> bool {
        self.cardinality.is_required()
    }

    pub fn is_array(&self) -> bool {
        self.cardinality.is_array()
    }

    /// Type codes, in declaration order
    pub fn type_codes(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.code.as_str())
    }
}

/// Type reference for a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyType {
    /// Type code (e.g., "string", "CodeableConcept", "Reference")
    pub code: String,
    /// Target profile URL (for References or profiled types)
    pub profile: Option<String>,
    /// Target resource types (for Reference properties)
    pub target_profiles: Vec<String>,
}

impl PropertyType {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            profile: None,
            target_profiles: Vec::new(),
        }
    }
}

/// Cardinality of a property (min..max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cardinality {
    /// Minimum occurrences
    pub min: u32,
    /// Maximum occurrences (None means unbounded/*)
    pub max: Option<u32>,
}

impl Cardinality {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Parse the `min`/`max` pair of an ElementDefinition
    pub fn from_element(min: Option<u32>, max: Option<&str>) -> Self {
        let max = match max {
            Some("*") => None,
            Some(n) => Some(n.parse().unwrap_or(1)),
            None => Some(1),
        };
        Self::new(min.unwrap_or(0), max)
    }

    /// Check if this property is a list/array
    pub fn is_array(&self) -> bool {
        self.max.map(|m| m > 1).unwrap_or(true)
    }

    /// Check if this property is optional
    pub fn is_optional(&self) -> bool {
        self.min == 0
    }

    /// Check if this property is required
    pub fn is_required(&self) -> bool {
        self.min > 0
    }
}

/// A backbone element (inline complex type) within a resource or datatype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackboneElement {
    /// Struct name (`ClaimItemDetail` for `Claim.item.detail`)
    pub name: String,
    /// Full path (e.g., "Patient.contact")
    pub path: String,
    /// Description
    pub description: Option<String>,
    /// Properties of this backbone element
    pub properties: Vec<Property>,
}
