//! Element, Extension, Meta and Narrative

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    Address, Age, Annotation, Attachment, CodeableConcept, CodeableReference, Coding,
    ContactDetail, ContactPoint, Count, Distance, Dosage, Duration, HumanName, Identifier, Money,
    Period, Quantity, Range, Ratio, Reference, SampledData, Signature, Timing, UsageContext,
};
use crate::common::decimal::Decimal;
use crate::common::primitive::Primitive;

/// Base of every datatype, and the shape of a primitive's `_field` sidecar
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique id for inter-element referencing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Additional content defined by implementations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Members not modeled here
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Element {
    pub fn with_extension(extension: Extension) -> Self {
        Self {
            extension: Some(vec![extension]),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Element, "Element");
crate::impl_element!(Element);

crate::choice_type! {
    /// Extension.value[x]
    pub enum ExtensionValue("value") {
        Base64Binary(Primitive<String>),
        Boolean(Primitive<bool>),
        Canonical(Primitive<String>),
        Code(Primitive<String>),
        Date(Primitive<String>),
        DateTime(Primitive<String>),
        Decimal(Primitive<Decimal>),
        Id(Primitive<String>),
        Instant(Primitive<String>),
        Integer(Primitive<i32>),
        /// R5 only; a JSON string
        Integer64(Primitive<String>),
        Markdown(Primitive<String>),
        Oid(Primitive<String>),
        PositiveInt(Primitive<u32>),
        String(Primitive<String>),
        Time(Primitive<String>),
        UnsignedInt(Primitive<u32>),
        Uri(Primitive<String>),
        Url(Primitive<String>),
        Uuid(Primitive<String>),
        Address(Address),
        Age(Age),
        Annotation(Annotation),
        Attachment(Attachment),
        CodeableConcept(CodeableConcept),
        CodeableReference(CodeableReference),
        Coding(Coding),
        ContactPoint(ContactPoint),
        Count(Count),
        Distance(Distance),
        Duration(Duration),
        HumanName(HumanName),
        Identifier(Identifier),
        Money(Money),
        Period(Period),
        Quantity(Quantity),
        Range(Range),
        Ratio(Ratio),
        RatioRange(Value),
        Reference(Reference),
        SampledData(SampledData),
        Signature(Signature),
        Timing(Timing),
        ContactDetail(ContactDetail),
        Contributor(Value),
        DataRequirement(Value),
        Expression(Value),
        ParameterDefinition(Value),
        RelatedArtifact(Value),
        TriggerDefinition(Value),
        UsageContext(UsageContext),
        Availability(Value),
        ExtendedContactDetail(Value),
        Dosage(Dosage),
        Meta(Value),
    }
}

/// Optional additional content
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Nested extensions (complex extensions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Identifies the meaning of the extension
    pub url: String,

    /// Value of extension; absent for complex extensions
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub value: Option<ExtensionValue>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Extension {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_value(url: impl Into<String>, value: ExtensionValue) -> Self {
        Self {
            url: url.into(),
            value: Some(value),
            ..Default::default()
        }
    }

    /// Nested extension by url
    pub fn child(&self, url: &str) -> Option<&Extension> {
        self.extension
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .find(|ext| ext.url == url)
    }
}

crate::fhir_model!(Extension, "Extension", choices = [ExtensionValue]);
crate::impl_element!(Extension);

crate::model_builder! {
    pub struct ExtensionBuilder => Extension {
        req set_url(url: String);
        set set_value(value: ExtensionValue);
        add add_extension(extension: Extension);
    }
}

impl ExtensionBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self::from(Extension::new(url))
    }
}

/// Metadata about a resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Version specific identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    #[serde(rename = "_versionId", skip_serializing_if = "Option::is_none")]
    pub version_id_ext: Option<Element>,

    /// When the resource version last changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    #[serde(rename = "_lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated_ext: Option<Element>,

    /// Identifies where the resource comes from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source_ext: Option<Element>,

    /// Profiles this resource claims to conform to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Vec<String>>,

    #[serde(rename = "_profile", skip_serializing_if = "Option::is_none")]
    pub profile_ext: Option<Vec<Option<Element>>>,

    /// Security Labels applied to this resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<Coding>>,

    /// Tags applied to this resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<Coding>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Meta {
    pub fn profiles(&self) -> &[String] {
        self.profile.as_deref().unwrap_or(&[])
    }

    /// Claim conformance to a profile; duplicates are ignored
    pub fn add_profile(&mut self, url: impl Into<String>) {
        let url = url.into();
        let profiles = self.profile.get_or_insert_with(Vec::new);
        if !profiles.contains(&url) {
            profiles.push(url);
        }
    }
}

crate::fhir_model!(Meta, "Meta");
crate::impl_element!(Meta);

crate::model_builder! {
    pub struct MetaBuilder => Meta {
        set set_version_id(version_id: String);
        set set_last_updated(last_updated: String);
        set set_source(source: String);
        add add_profile(profile: String);
        add add_security(security: Coding);
        add add_tag(tag: Coding);
    }
}

/// Status of a narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeStatus {
    #[default]
    Generated,
    Extensions,
    Additional,
    Empty,
}

/// Human-readable summary of a resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    pub status: NarrativeStatus,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    /// Limited xhtml content
    pub div: String,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Narrative {
    pub fn new(status: NarrativeStatus, div: impl Into<String>) -> Self {
        Self {
            status,
            div: div.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Narrative, "Narrative");
crate::impl_element!(Narrative);

crate::model_builder! {
    pub struct NarrativeBuilder => Narrative {
        req set_status(status: NarrativeStatus);
        req set_div(div: String);
    }
}

impl NarrativeBuilder {
    pub fn new(status: NarrativeStatus, div: impl Into<String>) -> Self {
        Self::from(Narrative::new(status, div))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::choice::ChoiceType;
    use crate::common::model::FhirModel;
    use serde_json::json;

    #[test]
    fn test_extension_value_roundtrip() {
        let json = json!({
            "url": "http://hl7.org/fhir/StructureDefinition/patient-birthTime",
            "valueDateTime": "1974-12-25T14:35:45-05:00"
        });
        let ext = Extension::from_json(&json).unwrap();
        assert_eq!(ext.value.as_ref().map(|v| v.tag()), Some("DateTime"));
        assert_eq!(ext.to_json().unwrap(), json);
    }

    #[test]
    fn test_complex_extension_has_no_value() {
        let json = json!({
            "url": "http://hl7.org/fhir/StructureDefinition/patient-nationality",
            "extension": [
                {"url": "code", "valueCodeableConcept": {"text": "Dutch"}},
                {"url": "period", "valuePeriod": {"start": "2000-01-01"}}
            ]
        });
        let ext = Extension::from_json(&json).unwrap();
        assert!(ext.value.is_none());
        assert!(matches!(
            ext.child("period").and_then(|e| e.value.as_ref()),
            Some(ExtensionValue::Period(_))
        ));
        assert_eq!(ext.to_json().unwrap(), json);
    }

    #[test]
    fn test_unmodeled_extension_value_kept_as_json() {
        let json = json!({
            "url": "http://example.org/expr",
            "valueExpression": {"language": "text/fhirpath", "expression": "today()"}
        });
        let ext = Extension::from_json(&json).unwrap();
        assert!(matches!(ext.value, Some(ExtensionValue::Expression(_))));
        assert_eq!(ext.to_json().unwrap(), json);
    }

    #[test]
    fn test_decimal_extension_keeps_scale() {
        let ext = Extension::from_json_str(r#"{"url":"http://example.org/dose","valueDecimal":2.50}"#).unwrap();
        match &ext.value {
            Some(ExtensionValue::Decimal(value)) => {
                assert_eq!(value.value().map(Decimal::scale), Some(2));
            }
            other => panic!("unexpected value {:?}", other),
        }
        assert_eq!(
            ext.to_json_string().unwrap(),
            r#"{"url":"http://example.org/dose","valueDecimal":2.50}"#
        );
    }

    #[test]
    fn test_extension_missing_url_rejected() {
        assert!(Extension::from_json(&json!({"valueBoolean": true})).is_err());
    }

    #[test]
    fn test_meta_add_profile_dedupes() {
        let mut meta = Meta::default();
        meta.add_profile("http://example.org/StructureDefinition/a");
        meta.add_profile("http://example.org/StructureDefinition/a");
        assert_eq!(meta.profiles().len(), 1);
    }

    #[test]
    fn test_repeating_primitive_sidecar() {
        let json = json!({
            "profile": ["http://a", "http://b"],
            "_profile": [null, {"id": "p2"}]
        });
        let meta = Meta::from_json(&json).unwrap();
        let sidecars = meta.profile_ext.as_ref().unwrap();
        assert!(sidecars[0].is_none());
        assert_eq!(sidecars[1].as_ref().and_then(|e| e.id.as_deref()), Some("p2"));
        assert_eq!(meta.to_json().unwrap(), json);
    }

    #[test]
    fn test_narrative_status_codes() {
        let narrative = Narrative::new(
            NarrativeStatus::Generated,
            "<div xmlns=\"http://www.w3.org/1999/xhtml\">x</div>",
        );
        let json = narrative.to_json().unwrap();
        assert_eq!(json["status"], "generated");
        assert_eq!(ExtensionValue::NAME, "value[x]");
    }
}
