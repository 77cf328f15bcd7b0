//! Parser for FHIR StructureDefinitions
//!
//! Extracts type information from FHIR StructureDefinitions and builds
//! an intermediate representation (IR) suitable for code generation.
//!
//! Input is a directory of JSON files. Each file holds either one
//! StructureDefinition or a Bundle of them (`profiles-resources.json`,
//! `profiles-types.json` from the FHIR distribution).

use crate::ir::{
    BackboneElement, Cardinality, Property, PropertyType, TypeDefinition, TypeKind, TypeRegistry,
};
use anyhow::{anyhow, Context, Result};
use fhirbind_models::conformance::{ElementDefinition, StructureDefinition, StructureDefinitionKind};
use fhirbind_models::model::FhirModel;
use heck::ToUpperCamelCase;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read every StructureDefinition found in the JSON files of `dir`
pub fn load_definitions(dir: &Path) -> Result<Vec<StructureDefinition>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading input directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    paths.sort();

    let mut definitions = Vec::new();
    for path in paths {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let json: Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing JSON in {}", path.display()))?;

        let before = definitions.len();
        collect_definitions(&json, &mut definitions);
        tracing::debug!(
            file = %path.display(),
            definitions = definitions.len() - before,
            "loaded definitions"
        );
    }

    Ok(definitions)
}

/// Collect StructureDefinitions from a single resource or a Bundle of them
pub fn collect_definitions(json: &Value, out: &mut Vec<StructureDefinition>) {
    match json.get("resourceType").and_then(Value::as_str) {
        Some("StructureDefinition") => match StructureDefinition::from_json(json) {
            Ok(sd) => out.push(sd),
            Err(e) => {
                let url = json.get("url").and_then(serde_json::Value::as_str).unwrap_or_default();
                tracing::warn!(url, error = %e, "skipping malformed StructureDefinition");
            }
        },
        Some("Bundle") => {
            let entries = json.get("entry").and_then(Value::as_array);
            for resource in entries.into_iter().flatten().filter_map(|e| e.get("resource")) {
                collect_definitions(resource, out);
            }
        }
        _ => {}
    }
}

/// Build a registry from loaded definitions.
///
/// Profiles (constraints) and logical models are skipped; only base
/// specializations describe wire shapes.
pub fn parse_definitions(definitions: &[StructureDefinition]) -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    let mut releases = Vec::new();

    for sd in definitions {
        if sd.is_profile() || sd.kind == StructureDefinitionKind::Logical {
            tracing::debug!(url = %sd.url, "skipping profile or logical model");
            continue;
        }

        let type_def = parse_structure_definition(sd)
            .with_context(|| format!("parsing StructureDefinition {}", sd.url))?;
        if let Some(release) = sd.release() {
            if !releases.contains(&release) {
                releases.push(release);
            }
        }
        registry.add_type(sd.url.clone(), type_def);
    }

    if releases.len() > 1 {
        tracing::warn!(?releases, "definitions span more than one FHIR release");
    }
    registry.set_release(match releases.as_slice() {
        [release] => Some(*release),
        _ => None,
    });

    tracing::info!(types = registry.len(), "built type registry");
    Ok(registry)
}

/// Parse a single StructureDefinition into a TypeDefinition
pub fn parse_structure_definition(sd: &StructureDefinition) -> Result<TypeDefinition> {
    let root = sd.type_.as_str();
    let kind = match sd.kind {
        StructureDefinitionKind::Resource => TypeKind::Resource,
        StructureDefinitionKind::ComplexType => TypeKind::ComplexType,
        StructureDefinitionKind::PrimitiveType => TypeKind::PrimitiveType,
        StructureDefinitionKind::Logical => {
            return Err(anyhow!("logical model {} has no wire shape", sd.url))
        }
    };

    let elements: Vec<&ElementDefinition> = sd
        .elements()
        .iter()
        .filter(|e| !e.is_slice() && !e.is_prohibited())
        .collect();

    // Backbone elements are the elements declaring children inline
    let mut backbone_elements: Vec<BackboneElement> = elements
        .iter()
        .filter(|e| e.is_backbone() && has_children(&elements, &e.path))
        .map(|e| BackboneElement {
            name: struct_name_for_path(&e.path),
            path: e.path.clone(),
            description: e.short.clone(),
            properties: Vec::new(),
        })
        .collect();

    let mut properties = Vec::new();
    for element in elements.iter().filter(|e| e.path != root) {
        let Some(parent) = element.parent_path() else {
            continue;
        };
        // Primitive definitions describe `value` and `id` with System types
        if kind == TypeKind::PrimitiveType {
            continue;
        }

        let is_backbone = backbone_elements.iter().any(|b| b.path == element.path);
        let property = parse_element(element, is_backbone)?;

        if parent == root {
            properties.push(property);
        } else if let Some(owner) = backbone_elements.iter_mut().find(|b| b.path == parent) {
            owner.properties.push(property);
        } else {
            tracing::warn!(path = %element.path, "element has no owning backbone, skipped");
        }
    }

    Ok(TypeDefinition {
        name: root.to_string(),
        url: Some(sd.url.clone()),
        description: sd.description.clone(),
        kind,
        base_type: sd.base_type().map(String::from),
        properties,
        is_abstract: sd.is_abstract,
        backbone_elements,
    })
}

fn has_children(elements: &[&ElementDefinition], path: &str) -> bool {
    elements.iter().any(|e| e.parent_path() == Some(path))
}

/// Parse a single element into a Property
fn parse_element(element: &ElementDefinition, is_backbone: bool) -> Result<Property> {
    let name = element.name().to_string();
    if name.is_empty() {
        return Err(anyhow!("Invalid path: {}", element.path));
    }

    let types = element
        .types
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|t| PropertyType {
            code: t.code.clone(),
            profile: t.profile.as_ref().and_then(|p| p.first().cloned()),
            target_profiles: t.target_profile.clone().unwrap_or_default(),
        })
        .collect();

    let inline_type = if is_backbone {
        Some(struct_name_for_path(&element.path))
    } else {
        element
            .content_reference
            .as_deref()
            .map(|reference| {
                let path = reference.rsplit('#').next().unwrap_or(reference);
                struct_name_for_path(path)
            })
    };

    Ok(Property {
        name,
        path: element.path.clone(),
        description: element.short.clone().or_else(|| element.definition.clone()),
        types,
        cardinality: Cardinality::from_element(element.min, element.max.as_deref()),
        is_modifier: element.is_modifier.unwrap_or(false),
        inline_type,
    })
}

/// Struct name for an element path: `Claim.item.detail` -> `ClaimItemDetail`
pub fn struct_name_for_path(path: &str) -> String {
    path.split('.')
        .map(|segment| segment.trim_end_matches("[x]").to_upper_camel_case())
        .collect()
}
