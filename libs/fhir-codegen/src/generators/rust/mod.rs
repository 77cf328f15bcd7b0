//! Rust code generator for FHIR types
//!
//! Produces one module per resource and per complex datatype not already
//! shipped with the models crate, plus a `mod.rs` declaring the release's
//! `Resource` union and Bundle aliases. Generated code relies on the models
//! crate's macros (`choice_type!`, `fhir_model!`, `model_builder!`, ...).

mod builder;
pub mod types;

use crate::generators::{Generator, GeneratorConfig};
use crate::ir::{BackboneElement, Property, TypeDefinition, TypeKind, TypeRegistry};
use anyhow::{bail, Result};
use fhirbind_models::FhirVersion;
use heck::ToSnakeCase;
use std::collections::BTreeMap;
use types::{StructShape, TypeMapper, PROVIDED_TYPES};

/// Output of the Rust generator
#[derive(Debug, Default)]
pub struct RustOutput {
    /// Generated modules indexed by file name
    pub modules: BTreeMap<String, String>,
}

/// Rust code generator
pub struct RustGenerator {
    config: GeneratorConfig,
}

impl RustGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(GeneratorConfig::default())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl Generator for RustGenerator {
    type Output = RustOutput;

    fn generate(&self, registry: &TypeRegistry) -> Result<Self::Output> {
        let release = self
            .config
            .release
            .or_else(|| registry.release())
            .unwrap_or(FhirVersion::R4);
        let mapper = TypeMapper::new(registry);
        let mut modules = BTreeMap::new();

        let datatypes: Vec<&TypeDefinition> = registry
            .complex_types()
            .into_iter()
            .filter(|t| !PROVIDED_TYPES.contains(&t.name.as_str()))
            .collect();
        let resources: Vec<&TypeDefinition> = registry
            .resource_types()
            .into_iter()
            .filter(|t| t.name != "Bundle")
            .collect();

        for type_def in datatypes.iter().chain(resources.iter()) {
            let file_name = self.get_module_name(&type_def.name);
            if modules.contains_key(&file_name) {
                bail!("two types map to module {}", file_name);
            }
            let code = self.generate_type_module(type_def, registry, &mapper);
            tracing::debug!(type_name = %type_def.name, file = %file_name, "generated module");
            modules.insert(file_name, code);
        }

        let mod_rs = self.generate_mod_rs(&datatypes, &resources, release);
        modules.insert("mod.rs".to_string(), mod_rs);

        tracing::info!(
            datatypes = datatypes.len(),
            resources = resources.len(),
            %release,
            "generated Rust models"
        );
        Ok(RustOutput { modules })
    }
}

impl RustGenerator {
    /// Convert a type name to a module name (snake_case)
    fn get_module_name(&self, type_name: &str) -> String {
        format!("{}.rs", type_name.to_snake_case())
    }

    /// Generate a complete module for a single type
    fn generate_type_module(
        &self,
        type_def: &TypeDefinition,
        registry: &TypeRegistry,
        mapper: &TypeMapper<'_>,
    ) -> String {
        let mut code = String::new();

        // Header comment
        code.push_str(&format!("//! {}\n", type_def.name));
        if self.config.generate_docs {
            if let Some(url) = &type_def.url {
                code.push_str(&format!("//!\n//! Generated from {}\n", url));
            }
        }
        code.push('\n');

        let mut body = String::new();
        let shape = if type_def.kind == TypeKind::Resource {
            if type_def.is_domain_resource() {
                StructShape::DomainResource
            } else {
                StructShape::Resource
            }
        } else {
            element_shape(&type_def.properties)
        };
        self.generate_struct(
            &mut body,
            &type_def.name,
            &type_def.name,
            type_def.description.as_deref(),
            shape,
            &type_def.properties,
            mapper,
        );
        if type_def.kind == TypeKind::ComplexType {
            body.push_str(&format!(
                "{}::complex_choice_value!({});\n\n",
                self.config.crate_path,
                type_def.name,
            ));
        }

        for backbone in &type_def.backbone_elements {
            self.generate_backbone(&mut body, backbone, mapper);
        }

        code.push_str(&self.generate_imports(type_def, registry, mapper, &body));
        code.push('\n');
        code.push_str(body.trim_end());
        code.push('\n');
        code
    }

    /// Generate imports for a type based on its dependencies
    fn generate_imports(
        &self,
        type_def: &TypeDefinition,
        registry: &TypeRegistry,
        mapper: &TypeMapper<'_>,
        body: &str,
    ) -> String {
        let mut code = String::new();
        code.push_str("use serde::{Deserialize, Serialize};\n");
        code.push_str("use serde_json::{Map, Value};\n\n");

        if type_def.kind == TypeKind::Resource || body.contains("Resource>") {
            code.push_str("use super::Resource;\n");
        }

        let deps: Vec<String> = registry
            .get_dependencies(type_def)
            .into_iter()
            .filter(|dep| mapper.is_generated(dep))
            .collect();
        if !deps.is_empty() {
            code.push_str(&format!("use super::{{{}}};\n", deps.join(", ")));
        }

        code.push_str(&format!("use {}::prelude::*;\n", self.config.crate_path));
        code
    }

    fn generate_backbone(&self, out: &mut String, backbone: &BackboneElement, mapper: &TypeMapper<'_>) {
        self.generate_struct(
            out,
            &backbone.name,
            &backbone.path,
            backbone.description.as_deref(),
            element_shape(&backbone.properties),
            &backbone.properties,
            mapper,
        );
    }

    /// Struct, its choice enums, trait impls and builder
    #[allow(clippy::too_many_arguments)]
    fn generate_struct(
        &self,
        out: &mut String,
        name: &str,
        type_name: &str,
        doc: Option<&str>,
        shape: StructShape,
        properties: &[Property],
        mapper: &TypeMapper<'_>,
    ) {
        let config = &self.config;
        let mut fields = types::base_fields(shape, config);
        fields.extend(
            properties
                .iter()
                .filter(|p| !shape.base_members().contains(&p.name.as_str()))
                .map(|p| mapper.plan(name, p, config)),
        );

        for choice in fields.iter().filter_map(|f| f.choice.as_ref()) {
            types::render_choice(out, choice, config);
        }

        types::render_struct(out, name, doc, shape, &fields, config);
        types::render_constructor(out, name, &fields);
        if types::needs_manual_default(&fields) {
            types::render_manual_default(out, name, shape, &fields);
        }

        let choices: Vec<&str> = fields
            .iter()
            .filter_map(|f| f.choice.as_ref().map(|c| c.enum_name.as_str()))
            .collect();
        if choices.is_empty() {
            out.push_str(&format!(
                "{}::fhir_model!({}, \"{}\");\n",
                config.crate_path,
                name,
                type_name,
            ));
        } else {
            out.push_str(&format!(
                "{}::fhir_model!({}, \"{}\", choices = [{}]);\n",
                config.crate_path,
                name,
                type_name,
                choices.join(", "),
            ));
        }
        out.push_str(&format!("{}\n\n", shape.impl_macro(&config.crate_path, name, type_name)));

        if config.generate_builders {
            builder::render_builder(out, name, &fields, config);
        }
    }

    fn generate_mod_rs(
        &self,
        datatypes: &[&TypeDefinition],
        resources: &[&TypeDefinition],
        release: FhirVersion,
    ) -> String {
        let crate_path = &self.config.crate_path;
        let mut code = String::new();

        code.push_str(&format!("//! Generated FHIR {} models\n\n", release));

        let mut modules: Vec<String> = datatypes
            .iter()
            .chain(resources.iter())
            .map(|t| t.name.to_snake_case())
            .collect();
        modules.sort();

        for module in &modules {
            code.push_str(&format!("mod {};\n", module));
        }
        code.push('\n');
        for module in &modules {
            code.push_str(&format!("pub use {}::*;\n", module));
        }

        code.push_str(&format!("\nuse {}::bundle;\n\n", crate_path));
        code.push_str(&format!("{}::resource_union! {{\n", crate_path));
        code.push_str(&format!("    /// Any {} resource\n", release));
        code.push_str(&format!("    pub enum Resource for {} {{\n", release));
        code.push_str("        Bundle(Bundle),\n");
        for resource in resources {
            code.push_str(&format!("        {}({}),\n", resource.name, resource.name));
        }
        code.push_str("    }\n}\n\n");

        code.push_str("pub type Bundle = bundle::Bundle<Resource>;\n");
        code.push_str("pub type BundleBuilder = bundle::BundleBuilder<Resource>;\n");
        code.push_str("pub type BundleEntry = bundle::BundleEntry<Resource>;\n");
        code.push_str("pub type BundleEntryResponse = bundle::BundleEntryResponse<Resource>;\n");
        code
    }
}

/// Backbone-like types carry `modifierExtension`
fn element_shape(properties: &[Property]) -> StructShape {
    if properties.iter().any(|p| p.name == "modifierExtension") {
        StructShape::Backbone
    } else {
        StructShape::Element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_definitions;
    use fhirbind_models::conformance::StructureDefinition;
    use fhirbind_models::model::FhirModel;
    use serde_json::json;

    fn element(path: &str, min: u32, max: &str, codes: &[&str]) -> serde_json::Value {
        let types: Vec<_> = codes.iter().map(|c| json!({"code": c})).collect();
        json!({"path": path, "min": min, "max": max, "type": types})
    }

    fn registry() -> TypeRegistry {
        let patient = json!({
            "resourceType": "StructureDefinition",
            "url": "http://hl7.org/fhir/StructureDefinition/Patient",
            "name": "Patient",
            "status": "active",
            "fhirVersion": "5.0.0",
            "kind": "resource",
            "abstract": false,
            "type": "Patient",
            "baseDefinition": "http://hl7.org/fhir/StructureDefinition/DomainResource",
            "derivation": "specialization",
            "snapshot": {"element": [
                {"path": "Patient", "min": 0, "max": "*"},
                element("Patient.id", 0, "1", &["http://hl7.org/fhirpath/System.String"]),
                element("Patient.meta", 0, "1", &["Meta"]),
                element("Patient.extension", 0, "*", &["Extension"]),
                element("Patient.active", 0, "1", &["boolean"]),
                element("Patient.name", 0, "*", &["HumanName"]),
                element("Patient.deceased[x]", 0, "1", &["boolean", "dateTime"]),
                element("Patient.link", 0, "*", &["BackboneElement"]),
                element("Patient.link.modifierExtension", 0, "*", &["Extension"]),
                element("Patient.link.other", 1, "1", &["Reference"]),
                element("Patient.link.type", 1, "1", &["code"]),
                element("Patient.virtualService", 0, "*", &["VirtualServiceDetail"])
            ]}
        });
        let virtual_service = json!({
            "resourceType": "StructureDefinition",
            "url": "http://hl7.org/fhir/StructureDefinition/VirtualServiceDetail",
            "name": "VirtualServiceDetail",
            "status": "active",
            "fhirVersion": "5.0.0",
            "kind": "complex-type",
            "abstract": false,
            "type": "VirtualServiceDetail",
            "derivation": "specialization",
            "snapshot": {"element": [
                {"path": "VirtualServiceDetail"},
                element("VirtualServiceDetail.id", 0, "1", &["http://hl7.org/fhirpath/System.String"]),
                element("VirtualServiceDetail.extension", 0, "*", &["Extension"]),
                element("VirtualServiceDetail.channelType", 0, "1", &["Coding"]),
                element("VirtualServiceDetail.address[x]", 0, "1", &["url", "string", "ContactPoint"])
            ]}
        });
        let definitions: Vec<StructureDefinition> = [patient, virtual_service]
            .iter()
            .map(|json| StructureDefinition::from_json(json).unwrap())
            .collect();
        parse_definitions(&definitions).unwrap()
    }

    #[test]
    fn test_generates_modules() {
        let output = RustGenerator::new_default().generate(&registry()).unwrap();
        let names: Vec<_> = output.modules.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["mod.rs", "patient.rs", "virtual_service_detail.rs"]);
    }

    #[test]
    fn test_resource_module_shape() {
        let output = RustGenerator::new_default().generate(&registry()).unwrap();
        let patient = &output.modules["patient.rs"];

        assert!(patient.contains("use super::Resource;\nuse super::{VirtualServiceDetail};\nuse fhirbind_models::prelude::*;"));
        assert!(patient.contains("    pub resource_type: ResourceTag<Patient>,"));
        assert!(patient.contains("    pub contained: Option<Vec<Resource>>,"));
        assert!(patient.contains("    pub active_ext: Option<Element>,"));
        assert!(patient.contains("pub enum PatientDeceased(\"deceased\") {"));
        assert!(patient.contains("    pub link: Option<Vec<PatientLink>>,"));
        assert!(patient.contains("fhirbind_models::fhir_model!(Patient, \"Patient\", choices = [PatientDeceased]);"));
        assert!(patient.contains("fhirbind_models::impl_domain_resource!(Patient, \"Patient\", contained = Resource);"));
        // base members from the snapshot are not emitted twice
        assert_eq!(patient.matches("pub meta:").count(), 1);

        assert!(patient.contains("fhirbind_models::fhir_model!(PatientLink, \"Patient.link\");"));
        assert!(patient.contains("fhirbind_models::impl_backbone_element!(PatientLink);"));
        assert!(patient.contains("    #[serde(rename = \"type\")]\n    pub type_: String,"));
        assert!(patient.contains("    pub fn new(other: impl Into<Reference>, type_: impl Into<String>) -> Self {"));
        assert!(patient.contains("impl PatientLinkBuilder {"));
    }

    #[test]
    fn test_datatype_module_shape() {
        let output = RustGenerator::new_default().generate(&registry()).unwrap();
        let detail = &output.modules["virtual_service_detail.rs"];

        assert!(!detail.contains("use super::Resource;"));
        assert!(detail.contains("pub enum VirtualServiceDetailAddress(\"address\") {"));
        assert!(detail.contains("        Url(Primitive<String>),"));
        assert!(detail.contains("        ContactPoint(ContactPoint),"));
        assert!(detail.contains("fhirbind_models::impl_element!(VirtualServiceDetail);"));
        assert!(detail.contains("fhirbind_models::complex_choice_value!(VirtualServiceDetail);"));
    }

    #[test]
    fn test_mod_rs_declares_union() {
        let output = RustGenerator::new_default().generate(&registry()).unwrap();
        let mod_rs = &output.modules["mod.rs"];

        assert!(mod_rs.starts_with("//! Generated FHIR R5 models"));
        assert!(mod_rs.contains("mod patient;\nmod virtual_service_detail;\n"));
        assert!(mod_rs.contains("    pub enum Resource for R5 {\n        Bundle(Bundle),\n        Patient(Patient),\n    }"));
        assert!(mod_rs.contains("pub type Bundle = bundle::Bundle<Resource>;"));
    }

    #[test]
    fn test_config_switches() {
        let config = GeneratorConfig {
            generate_docs: false,
            generate_builders: false,
            extension_sidecars: false,
            crate_path: "crate".to_string(),
            release: Some(FhirVersion::R4),
        };
        let output = RustGenerator::new(config).generate(&registry()).unwrap();
        let patient = &output.modules["patient.rs"];

        assert!(!patient.contains("model_builder!"));
        assert!(!patient.contains("_ext:"));
        assert!(!patient.contains("Generated from"));
        assert!(patient.contains("use crate::prelude::*;"));
        assert!(output.modules["mod.rs"].contains("pub enum Resource for R4 {"));
    }
}
