//! Type generation for Rust structs
//!
//! Properties are first planned into [`FieldPlan`]s (Rust identifier, type,
//! cardinality, sidecar, choice variants), then rendered. The builder renderer
//! reads the same plans, so structs and builders stay in lockstep.

use crate::generators::GeneratorConfig;
use crate::ir::{is_primitive_type, Property, TypeKind, TypeRegistry};
use heck::{ToLowerCamelCase, ToSnakeCase};

/// Datatypes shipped with the models crate; never regenerated
pub const PROVIDED_TYPES: &[&str] = &[
    "Address",
    "Age",
    "Annotation",
    "Attachment",
    "Bundle",
    "CodeableConcept",
    "CodeableReference",
    "Coding",
    "ContactDetail",
    "ContactPoint",
    "Count",
    "Distance",
    "Dosage",
    "Duration",
    "Element",
    "Extension",
    "HumanName",
    "Identifier",
    "Meta",
    "Money",
    "Narrative",
    "Period",
    "Quantity",
    "Range",
    "Ratio",
    "Reference",
    "SampledData",
    "Signature",
    "Timing",
    "UsageContext",
];

const SYSTEM_TYPE_PREFIX: &str = "http://hl7.org/fhirpath/System.";

/// Which base members a struct starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructShape {
    /// DomainResource: narrative, contained resources, extensions
    DomainResource,
    /// Resource only: id, meta, implicitRules, language
    Resource,
    /// BackboneElement / BackboneType: id, extension, modifierExtension
    Backbone,
    /// Element: id, extension
    Element,
}

impl StructShape {
    /// JSON members covered by the shape's base fields
    pub fn base_members(&self) -> &'static [&'static str] {
        match self {
            StructShape::DomainResource => &[
                "id",
                "meta",
                "implicitRules",
                "language",
                "text",
                "contained",
                "extension",
                "modifierExtension",
            ],
            StructShape::Resource => &["id", "meta", "implicitRules", "language"],
            StructShape::Backbone => &["id", "extension", "modifierExtension"],
            StructShape::Element => &["id", "extension"],
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, StructShape::DomainResource | StructShape::Resource)
    }

    /// Trait impl macro line for a struct of this shape
    pub fn impl_macro(&self, crate_path: &str, name: &str, type_name: &str) -> String {
        match self {
            StructShape::DomainResource => format!(
                "{}::impl_domain_resource!({}, \"{}\", contained = Resource);",
                crate_path, name, type_name
            ),
            StructShape::Resource => {
                format!("{}::impl_resource!({}, \"{}\");", crate_path, name, type_name)
            }
            StructShape::Backbone => format!("{}::impl_backbone_element!({});", crate_path, name),
            StructShape::Element => format!("{}::impl_element!({});", crate_path, name),
        }
    }
}

/// A planned choice element
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePlan {
    pub enum_name: String,
    /// Element path with `[x]` (`Observation.value[x]`)
    pub path: String,
    /// (type suffix, Rust type) per variant, in declaration order
    pub variants: Vec<(String, String)>,
}

/// A planned struct field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlan {
    /// JSON member name, or prefix for a choice element
    pub json_name: String,
    /// Rust identifier (`birth_date`, `type_`)
    pub ident: String,
    pub doc: Option<String>,
    pub is_modifier: bool,
    /// Element type, or the enum name for a choice element
    pub ty: String,
    pub required: bool,
    pub array: bool,
    /// Single recursive reference, stored boxed
    pub boxed: bool,
    /// Primitive with a `_member` sidecar
    pub sidecar: bool,
    pub choice: Option<ChoicePlan>,
}

impl FieldPlan {
    fn base(json_name: &str, ty: &str, doc: Option<&str>) -> Self {
        Self {
            json_name: json_name.to_string(),
            ident: field_ident(json_name),
            doc: doc.map(String::from),
            is_modifier: false,
            ty: ty.to_string(),
            required: false,
            array: false,
            boxed: false,
            sidecar: false,
            choice: None,
        }
    }

    fn repeated(mut self) -> Self {
        self.array = true;
        self
    }

    fn with_sidecar(mut self, sidecar: bool) -> Self {
        self.sidecar = sidecar;
        self
    }

    /// Identifier without the keyword suffix, used in method names
    pub fn method_stem(&self) -> &str {
        self.ident.trim_end_matches('_')
    }

    /// Full Rust type of the field
    pub fn rust_type(&self) -> String {
        let element = if self.boxed {
            format!("Box<{}>", self.ty)
        } else {
            self.ty.clone()
        };
        match (self.required, self.array) {
            (true, true) => format!("Vec<{}>", element),
            (true, false) => element,
            (false, true) => format!("Option<Vec<{}>>", element),
            (false, false) => format!("Option<{}>", element),
        }
    }

    /// Element type taken by the builder setter
    pub fn setter_type(&self) -> String {
        if self.boxed {
            format!("Box<{}>", self.ty)
        } else {
            self.ty.clone()
        }
    }
}

/// Base fields of a shape, in the order the models crate declares them
pub fn base_fields(shape: StructShape, config: &GeneratorConfig) -> Vec<FieldPlan> {
    let sidecars = config.extension_sidecars;
    let id = FieldPlan::base("id", "String", Some("Logical id of this artifact"));
    let meta = FieldPlan::base("meta", "Meta", Some("Metadata about the resource"));
    let implicit_rules = FieldPlan::base(
        "implicitRules",
        "String",
        Some("A set of rules under which this content was created"),
    )
    .with_sidecar(sidecars);
    let language = FieldPlan::base("language", "String", Some("Language of the resource content"))
        .with_sidecar(sidecars);
    let extension = FieldPlan::base("extension", "Extension", None).repeated();
    let modifier_extension = FieldPlan::base("modifierExtension", "Extension", None).repeated();

    match shape {
        StructShape::DomainResource => vec![
            id,
            meta,
            implicit_rules,
            language,
            FieldPlan::base(
                "text",
                "Narrative",
                Some("Text summary of the resource, for human interpretation"),
            ),
            FieldPlan::base("contained", "Resource", Some("Contained, inline Resources")).repeated(),
            extension,
            modifier_extension,
        ],
        StructShape::Resource => vec![id, meta, implicit_rules, language],
        StructShape::Backbone => vec![
            FieldPlan::base("id", "String", None),
            extension,
            modifier_extension,
        ],
        StructShape::Element => vec![FieldPlan::base("id", "String", None), extension],
    }
}

/// Maps FHIR type codes to Rust types
pub struct TypeMapper<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> TypeMapper<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Whether a complex type is emitted by this generator run
    pub fn is_generated(&self, name: &str) -> bool {
        !PROVIDED_TYPES.contains(&name)
            && self
                .registry
                .get_type_by_name(name)
                .map_or(false, |t| t.kind == TypeKind::ComplexType && !t.is_abstract)
    }

    /// Rust type for a type code and whether it is a FHIR primitive
    pub fn map(&self, code: &str) -> (String, bool) {
        if let Some(system) = code.strip_prefix(SYSTEM_TYPE_PREFIX) {
            let ty = match system {
                "Boolean" => "bool",
                "Integer" => "i32",
                "Decimal" => "Decimal",
                _ => "String",
            };
            return (ty.to_string(), false);
        }
        if let Some(primitive) = primitive_rust_type(code) {
            return (primitive.to_string(), code != "xhtml");
        }
        let complex = match code {
            "SimpleQuantity" | "MoneyQuantity" => "Quantity".to_string(),
            "Resource" => "Resource".to_string(),
            c if PROVIDED_TYPES.contains(&c) => c.to_string(),
            c if self.is_generated(c) => c.to_string(),
            other => {
                tracing::debug!(code = other, "no model for type, using raw JSON");
                "Value".to_string()
            }
        };
        (complex, false)
    }

    /// Variant (suffix, Rust type) of a choice element
    pub fn choice_variant(&self, code: &str) -> (String, String) {
        let (ty, primitive) = self.map(code);
        let ty = if primitive {
            format!("Primitive<{}>", ty)
        } else {
            ty
        };
        (type_suffix(code), ty)
    }

    /// Plan one property of the struct `owner`
    pub fn plan(&self, owner: &str, property: &Property, config: &GeneratorConfig) -> FieldPlan {
        let json_name = property.json_name();
        let mut plan = FieldPlan::base(json_name, "Value", property.description.as_deref());
        plan.is_modifier = property.is_modifier;
        plan.required = property.is_required();
        plan.array = property.is_array();

        if property.is_choice() {
            let enum_name = format!("{}{}", owner, type_suffix(json_name));
            plan.ty = enum_name.clone();
            plan.array = false;
            plan.choice = Some(ChoicePlan {
                enum_name,
                path: property.path.clone(),
                variants: property.type_codes().map(|c| self.choice_variant(c)).collect(),
            });
            return plan;
        }

        if let Some(inline) = &property.inline_type {
            plan.ty = inline.clone();
            // contentReference members may point back at an enclosing struct
            plan.boxed = property.types.is_empty() && !plan.array;
            return plan;
        }

        if let Some(code) = property.type_codes().next() {
            let (ty, primitive) = self.map(code);
            plan.ty = ty;
            plan.sidecar = primitive && config.extension_sidecars;
        }
        plan
    }
}

fn primitive_rust_type(code: &str) -> Option<&'static str> {
    if !is_primitive_type(code) {
        return None;
    }
    Some(match code {
        "boolean" => "bool",
        "integer" => "i32",
        "unsignedInt" | "positiveInt" => "u32",
        "decimal" => "Decimal",
        // integer64 is a JSON string
        _ => "String",
    })
}

/// Member suffix for a type code: `dateTime` -> `DateTime`
pub fn type_suffix(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rust identifier for a JSON member name
pub fn field_ident(json_name: &str) -> String {
    let snake = json_name.to_snake_case();
    if is_rust_keyword(&snake) {
        format!("{}_", snake)
    } else {
        snake
    }
}

/// Whether `rename_all = "camelCase"` alone reproduces the member name
fn needs_rename(ident: &str, json_name: &str) -> bool {
    ident.ends_with('_') || ident.to_lower_camel_case() != json_name
}

/// Render a `choice_type!` declaration
pub fn render_choice(out: &mut String, choice: &ChoicePlan, config: &GeneratorConfig) {
    let prefix = choice.path.rsplit('.').next().unwrap_or(&choice.path);
    let prefix = prefix.trim_end_matches("[x]");

    out.push_str(&format!("{}::choice_type! {{\n", config.crate_path));
    out.push_str(&format!("    /// {}\n", choice.path));
    out.push_str(&format!("    pub enum {}(\"{}\") {{\n", choice.enum_name, prefix));
    for (tag, ty) in &choice.variants {
        out.push_str(&format!("        {}({}),\n", tag, ty));
    }
    out.push_str("    }\n}\n\n");
}

/// Render a struct declaration with its fields
pub fn render_struct(
    out: &mut String,
    name: &str,
    doc: Option<&str>,
    shape: StructShape,
    fields: &[FieldPlan],
    config: &GeneratorConfig,
) {
    if config.generate_docs {
        if let Some(doc) = doc.and_then(first_line) {
            out.push_str(&format!("/// {}\n", doc));
        }
    }

    let derives_default = !needs_manual_default(fields);
    if derives_default {
        out.push_str("#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]\n");
    } else {
        out.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
    }
    out.push_str("#[serde(rename_all = \"camelCase\")]\n");
    out.push_str(&format!("pub struct {} {{\n", name));

    if shape.is_resource() {
        out.push_str("    #[serde(default)]\n");
        out.push_str(&format!("    pub resource_type: ResourceTag<{}>,\n\n", name));
    }

    for field in fields {
        render_field(out, field, config);
    }

    out.push_str("    #[serde(flatten)]\n");
    out.push_str("    pub additional: Map<String, Value>,\n");
    out.push_str("}\n\n");
}

fn render_field(out: &mut String, field: &FieldPlan, config: &GeneratorConfig) {
    if config.generate_docs {
        if let Some(doc) = field.doc.as_deref().and_then(first_line) {
            out.push_str(&format!("    /// {}\n", doc));
        }
        if field.is_modifier {
            out.push_str("    /// **Modifier element**\n");
        }
    }

    if field.choice.is_some() {
        if field.required {
            out.push_str("    #[serde(flatten)]\n");
        } else {
            out.push_str(&format!(
                "    #[serde(flatten, deserialize_with = \"{}::choice::optional\")]\n",
                config.crate_path,
            ));
        }
        out.push_str(&format!("    pub {}: {},\n\n", field.ident, field.rust_type()));
        return;
    }

    let mut attrs = Vec::new();
    if needs_rename(&field.ident, &field.json_name) {
        attrs.push(format!("rename = \"{}\"", field.json_name));
    }
    match (field.required, field.array) {
        (true, true) => attrs.push("default, skip_serializing_if = \"Vec::is_empty\"".to_string()),
        (true, false) => {}
        (false, _) => attrs.push("skip_serializing_if = \"Option::is_none\"".to_string()),
    }
    if !attrs.is_empty() {
        out.push_str(&format!("    #[serde({})]\n", attrs.join(", ")));
    }
    out.push_str(&format!("    pub {}: {},\n\n", field.ident, field.rust_type()));

    if field.sidecar {
        let sidecar_ty = if field.array {
            "Option<Vec<Option<Element>>>"
        } else {
            "Option<Element>"
        };
        out.push_str(&format!(
            "    #[serde(rename = \"_{}\", skip_serializing_if = \"Option::is_none\")]\n",
            field.json_name,
        ));
        out.push_str(&format!("    pub {}_ext: {},\n\n", field.method_stem(), sidecar_ty));
    }
}

/// Required choices have no `Default`; the first variant stands in
pub fn needs_manual_default(fields: &[FieldPlan]) -> bool {
    fields.iter().any(|f| f.required && f.choice.is_some())
}

/// Render `impl Default` for structs holding a required choice
pub fn render_manual_default(
    out: &mut String,
    name: &str,
    shape: StructShape,
    fields: &[FieldPlan],
) {
    out.push_str(&format!("impl Default for {} {{\n", name));
    out.push_str("    fn default() -> Self {\n        Self {\n");
    if shape.is_resource() {
        out.push_str("            resource_type: ResourceTag::new(),\n");
    }
    for field in fields {
        match &field.choice {
            Some(choice) if field.required => {
                let first = choice
                    .variants
                    .first()
                    .map(|(tag, _)| tag.as_str())
                    .unwrap_or_default();
                out.push_str(&format!(
                    "            {}: {}::{}(Default::default()),\n",
                    field.ident,
                    choice.enum_name,
                    first,
                ));
            }
            _ => {
                out.push_str(&format!("            {}: Default::default(),\n", field.ident));
            }
        }
        if field.sidecar {
            out.push_str(&format!("            {}_ext: None,\n", field.method_stem()));
        }
    }
    out.push_str("            additional: Map::new(),\n        }\n    }\n}\n\n");
}

/// `impl X { pub fn new(..) }` over the required single-valued fields
pub fn render_constructor(out: &mut String, name: &str, fields: &[FieldPlan]) {
    let required: Vec<&FieldPlan> = fields.iter().filter(|f| f.required && !f.array).collect();
    if required.is_empty() {
        return;
    }

    let params: Vec<String> = required
        .iter()
        .map(|f| format!("{}: impl Into<{}>", f.ident, f.rust_type()))
        .collect();
    out.push_str(&format!("impl {} {{\n", name));
    out.push_str(&format!("    pub fn new({}) -> Self {{\n", params.join(", ")));
    out.push_str("        Self {\n");
    for field in &required {
        out.push_str(&format!("            {}: {}.into(),\n", field.ident, field.ident));
    }
    out.push_str("            ..Default::default()\n        }\n    }\n}\n\n");
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Check if a string is a Rust keyword
fn is_rust_keyword(s: &str) -> bool {
    matches!(
        s,
        "as" | "break"
            | "const"
            | "continue"
            | "crate"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "async"
            | "await"
            | "dyn"
            | "abstract"
            | "become"
            | "box"
            | "class"
            | "do"
            | "final"
            | "macro"
            | "override"
            | "priv"
            | "typeof"
            | "unsized"
            | "virtual"
            | "yield"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Cardinality, PropertyType, TypeDefinition};

    fn property(name: &str, codes: &[&str], min: u32, max: Option<u32>) -> Property {
        Property {
            name: name.to_string(),
            path: format!("Observation.{}", name),
            description: Some("A member".to_string()),
            types: codes.iter().map(|c| PropertyType::new(*c)).collect(),
            cardinality: Cardinality::new(min, max),
            is_modifier: false,
            inline_type: None,
        }
    }

    fn registry_with(name: &str) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.add_type(
            name.to_string(),
            TypeDefinition {
                name: name.to_string(),
                url: None,
                description: None,
                kind: TypeKind::ComplexType,
                base_type: Some("DataType".into()),
                properties: Vec::new(),
                is_abstract: false,
                backbone_elements: Vec::new(),
            },
        );
        registry
    }

    #[test]
    fn test_field_idents() {
        assert_eq!(field_ident("birthDate"), "birth_date");
        assert_eq!(field_ident("type"), "type_");
        assert_eq!(field_ident("class"), "class_");
        assert!(needs_rename("type_", "type"));
        assert!(!needs_rename("birth_date", "birthDate"));
    }

    #[test]
    fn test_type_mapping() {
        let registry = registry_with("Expression");
        let mapper = TypeMapper::new(&registry);

        assert_eq!(mapper.map("boolean"), ("bool".to_string(), true));
        assert_eq!(mapper.map("positiveInt"), ("u32".to_string(), true));
        assert_eq!(mapper.map("decimal"), ("Decimal".to_string(), true));
        assert_eq!(mapper.map("xhtml"), ("String".to_string(), false));
        assert_eq!(
            mapper.map("http://hl7.org/fhirpath/System.String"),
            ("String".to_string(), false)
        );
        assert_eq!(mapper.map("SimpleQuantity").0, "Quantity");
        assert_eq!(mapper.map("Expression").0, "Expression");
        assert_eq!(mapper.map("RelatedArtifact").0, "Value");
        assert_eq!(
            mapper.choice_variant("dateTime"),
            ("DateTime".to_string(), "Primitive<String>".to_string())
        );
    }

    #[test]
    fn test_plan_primitive_with_sidecar() {
        let registry = TypeRegistry::new();
        let mapper = TypeMapper::new(&registry);
        let config = GeneratorConfig::default();

        let plan = mapper.plan("Patient", &property("given", &["string"], 0, None), &config);
        assert_eq!(plan.rust_type(), "Option<Vec<String>>");
        assert!(plan.sidecar);

        let mut out = String::new();
        render_field(&mut out, &plan, &config);
        assert!(out.contains("pub given: Option<Vec<String>>,"));
        assert!(out.contains("pub given_ext: Option<Vec<Option<Element>>>,"));

        let no_sidecars = GeneratorConfig {
            extension_sidecars: false,
            ..GeneratorConfig::default()
        };
        assert!(!mapper.plan("Patient", &property("given", &["string"], 0, None), &no_sidecars).sidecar);
    }

    #[test]
    fn test_plan_required_array() {
        let registry = TypeRegistry::new();
        let mapper = TypeMapper::new(&registry);
        let config = GeneratorConfig::default();

        let plan = mapper.plan("Claim", &property("insurance", &["Reference"], 1, None), &config);
        assert_eq!(plan.rust_type(), "Vec<Reference>");

        let mut out = String::new();
        render_field(&mut out, &plan, &config);
        assert!(out.contains("#[serde(default, skip_serializing_if = \"Vec::is_empty\")]"));
    }

    #[test]
    fn test_plan_choice() {
        let registry = TypeRegistry::new();
        let mapper = TypeMapper::new(&registry);
        let config = GeneratorConfig::default();

        let plan = mapper.plan(
            "Observation",
            &property("value[x]", &["Quantity", "string", "boolean"], 0, Some(1)),
            &config,
        );
        let choice = plan.choice.as_ref().unwrap();
        assert_eq!(plan.ident, "value");
        assert_eq!(choice.enum_name, "ObservationValue");
        assert_eq!(choice.variants[1], ("String".to_string(), "Primitive<String>".to_string()));

        let mut out = String::new();
        render_choice(&mut out, choice, &config);
        assert!(out.contains("pub enum ObservationValue(\"value\") {"));
        assert!(out.contains("        Boolean(Primitive<bool>),"));

        let mut field = String::new();
        render_field(&mut field, &plan, &config);
        assert!(field.contains("deserialize_with = \"fhirbind_models::choice::optional\""));
        assert!(field.contains("pub value: Option<ObservationValue>,"));
    }

    #[test]
    fn test_render_choice_exact_output() {
        let choice = ChoicePlan {
            enum_name: "SubstanceAmount".into(),
            path: "Substance.amount[x]".into(),
            variants: vec![
                ("Quantity".into(), "Quantity".into()),
                ("Decimal".into(), "Primitive<Decimal>".into()),
            ],
        };

        let mut out = String::new();
        render_choice(&mut out, &choice, &GeneratorConfig::default());
        assert_eq!(
            out,
            "fhirbind_models::choice_type! {\n\
             \x20   /// Substance.amount[x]\n\
             \x20   pub enum SubstanceAmount(\"amount\") {\n\
             \x20       Quantity(Quantity),\n\
             \x20       Decimal(Primitive<Decimal>),\n\
             \x20   }\n\
             }\n\n"
        );
    }

    #[test]
    fn test_manual_default_for_required_choice() {
        let registry = TypeRegistry::new();
        let mapper = TypeMapper::new(&registry);
        let config = GeneratorConfig::default();
        let fields = vec![mapper.plan(
            "MedicationRequest",
            &property("medication[x]", &["CodeableConcept", "Reference"], 1, Some(1)),
            &config,
        )];
        assert!(needs_manual_default(&fields));

        let mut out = String::new();
        render_manual_default(&mut out, "MedicationRequest", StructShape::DomainResource, &fields);
        assert!(out.contains(
            "medication: MedicationRequestMedication::CodeableConcept(Default::default()),"
        ));
        assert!(out.contains("resource_type: ResourceTag::new(),"));
    }

    #[test]
    fn test_constructor_takes_required_fields() {
        let registry = TypeRegistry::new();
        let mapper = TypeMapper::new(&registry);
        let config = GeneratorConfig::default();
        let fields = vec![
            mapper.plan("Link", &property("other", &["Reference"], 1, Some(1)), &config),
            mapper.plan("Link", &property("type", &["code"], 1, Some(1)), &config),
            mapper.plan("Link", &property("note", &["string"], 0, Some(1)), &config),
        ];

        let mut out = String::new();
        render_constructor(&mut out, "Link", &fields);
        assert!(out.contains(
            "pub fn new(other: impl Into<Reference>, type_: impl Into<String>) -> Self {"
        ));
        assert!(out.contains("type_: type_.into(),"));
    }
}
