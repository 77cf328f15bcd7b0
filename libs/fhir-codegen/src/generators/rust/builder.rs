//! Builder generation
//!
//! Emits one `model_builder!` invocation per struct from the same field plans
//! used for the struct itself.

use super::types::FieldPlan;
use crate::generators::GeneratorConfig;

/// Setter kind understood by `model_builder!`
fn setter_kind(field: &FieldPlan) -> &'static str {
    match (field.required, field.array) {
        (false, false) => "set",
        (true, false) => "req",
        (false, true) => "add",
        (true, true) => "push",
    }
}

fn setter_name(field: &FieldPlan) -> String {
    let verb = if field.array { "add" } else { "set" };
    format!("{}_{}", verb, field.method_stem())
}

/// Render the builder for struct `name`
pub fn render_builder(out: &mut String, name: &str, fields: &[FieldPlan], config: &GeneratorConfig) {
    out.push_str(&format!("{}::model_builder! {{\n", config.crate_path));
    out.push_str(&format!("    pub struct {}Builder => {} {{\n", name, name));
    for field in fields {
        out.push_str(&format!(
            "        {} {}({}: {});\n",
            setter_kind(field),
            setter_name(field),
            field.ident,
            field.setter_type(),
        ));
    }
    out.push_str("    }\n}\n\n");

    let required: Vec<&FieldPlan> = fields.iter().filter(|f| f.required && !f.array).collect();
    if required.is_empty() {
        return;
    }

    let params: Vec<String> = required
        .iter()
        .map(|f| format!("{}: impl Into<{}>", f.ident, f.rust_type()))
        .collect();
    let args: Vec<&str> = required.iter().map(|f| f.ident.as_str()).collect();
    out.push_str(&format!("impl {}Builder {{\n", name));
    out.push_str(&format!("    pub fn new({}) -> Self {{\n", params.join(", ")));
    out.push_str(&format!("        Self::from({}::new({}))\n", name, args.join(", ")));
    out.push_str("    }\n}\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::rust::types::{base_fields, StructShape};

    #[test]
    fn test_builder_setters() {
        let config = GeneratorConfig::default();
        let mut fields = base_fields(StructShape::Backbone, &config);
        fields.push(FieldPlan {
            json_name: "type".into(),
            ident: "type_".into(),
            doc: None,
            is_modifier: false,
            ty: "CodeableConcept".into(),
            required: true,
            array: false,
            boxed: false,
            sidecar: false,
            choice: None,
        });

        let mut out = String::new();
        render_builder(&mut out, "ClaimPayee", &fields, &config);

        assert!(out.starts_with("fhirbind_models::model_builder! {\n    pub struct ClaimPayeeBuilder => ClaimPayee {\n"));
        assert!(out.contains("        set set_id(id: String);\n"));
        assert!(out.contains("        add add_modifier_extension(modifier_extension: Extension);\n"));
        assert!(out.contains("        req set_type(type_: CodeableConcept);\n"));
        assert!(out.contains("    pub fn new(type_: impl Into<CodeableConcept>) -> Self {\n"));
        assert!(out.contains("        Self::from(ClaimPayee::new(type_))\n"));
    }

    #[test]
    fn test_required_array_uses_push() {
        let config = GeneratorConfig::default();
        let field = FieldPlan {
            json_name: "issue".into(),
            ident: "issue".into(),
            doc: None,
            is_modifier: false,
            ty: "OperationOutcomeIssue".into(),
            required: true,
            array: true,
            boxed: false,
            sidecar: false,
            choice: None,
        };

        let mut out = String::new();
        render_builder(&mut out, "OperationOutcome", &[field], &config);
        assert!(out.contains("push add_issue(issue: OperationOutcomeIssue);"));
        assert!(!out.contains("pub fn new"));
    }
}
