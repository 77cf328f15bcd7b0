//! General-purpose datatypes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Element, Extension};
use crate::common::decimal::Decimal;
use crate::common::primitive::Primitive;

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Identity of the terminology system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(rename = "_system", skip_serializing_if = "Option::is_none")]
    pub system_ext: Option<Element>,

    /// Version of the system - if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version_ext: Option<Element>,

    /// Symbol in syntax defined by the system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(rename = "_code", skip_serializing_if = "Option::is_none")]
    pub code_ext: Option<Element>,

    /// Representation defined by the system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(rename = "_display", skip_serializing_if = "Option::is_none")]
    pub display_ext: Option<Element>,

    /// If this coding was chosen directly by the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected: Option<bool>,

    #[serde(rename = "_userSelected", skip_serializing_if = "Option::is_none")]
    pub user_selected_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Coding {
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            ..Default::default()
        }
    }

    /// Whether this coding has the given system and code
    pub fn is(&self, system: &str, code: &str) -> bool {
        self.system.as_deref() == Some(system) && self.code.as_deref() == Some(code)
    }
}

crate::fhir_model!(Coding, "Coding");
crate::impl_element!(Coding);

crate::model_builder! {
    pub struct CodingBuilder => Coding {
        set set_system(system: String);
        set set_version(version: String);
        set set_code(code: String);
        set set_display(display: String);
        set set_user_selected(user_selected: bool);
    }
}

/// Concept - reference to a terminology or just text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Code defined by a terminology system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding: Option<Vec<Coding>>,

    /// Plain text representation of the concept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: Some(vec![coding]),
            ..Default::default()
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn codings(&self) -> &[Coding] {
        self.coding.as_deref().unwrap_or(&[])
    }

    /// Whether any coding matches the given system and code
    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.codings().iter().any(|c| c.is(system, code))
    }
}

impl From<Coding> for CodeableConcept {
    fn from(coding: Coding) -> Self {
        CodeableConcept::from_coding(coding)
    }
}

crate::fhir_model!(CodeableConcept, "CodeableConcept");
crate::impl_element!(CodeableConcept);

crate::model_builder! {
    pub struct CodeableConceptBuilder => CodeableConcept {
        add add_coding(coding: Coding);
        set set_text(text: String);
    }
}

/// Reference to a resource or a concept (R5)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl From<CodeableConcept> for CodeableReference {
    fn from(concept: CodeableConcept) -> Self {
        Self {
            concept: Some(concept),
            ..Default::default()
        }
    }
}

impl From<Reference> for CodeableReference {
    fn from(reference: Reference) -> Self {
        Self {
            reference: Some(reference),
            ..Default::default()
        }
    }
}

crate::fhir_model!(CodeableReference, "CodeableReference");
crate::impl_element!(CodeableReference);

crate::model_builder! {
    pub struct CodeableReferenceBuilder => CodeableReference {
        set set_concept(concept: CodeableConcept);
        set set_reference(reference: Reference);
    }
}

/// Identifies the purpose of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierUse {
    Usual,
    Official,
    Temp,
    Secondary,
    Old,
}

/// An identifier intended for computation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// usual | official | temp | secondary | old
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<IdentifierUse>,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    /// Description of identifier
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    /// The namespace for the identifier value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(rename = "_system", skip_serializing_if = "Option::is_none")]
    pub system_ext: Option<Element>,

    /// The value that is unique
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "_value", skip_serializing_if = "Option::is_none")]
    pub value_ext: Option<Element>,

    /// Time period when id is/was valid for use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    /// Organization that issued id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigner: Option<Box<Reference>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Identifier {
    pub fn new(system: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Identifier, "Identifier");
crate::impl_element!(Identifier);

crate::model_builder! {
    pub struct IdentifierBuilder => Identifier {
        set set_use(use_: IdentifierUse);
        set set_type(type_: CodeableConcept);
        set set_system(system: String);
        set set_value(value: String);
        set set_period(period: Period);
        set set_assigner(assigner: Box<Reference>);
    }
}

/// A reference from one resource to another
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Literal reference, relative, internal or absolute URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "_reference", skip_serializing_if = "Option::is_none")]
    pub reference_ext: Option<Element>,

    /// Type the reference refers to (e.g. "Patient")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub type_ext: Option<Element>,

    /// Logical reference, when literal reference is not known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Box<Identifier>>,

    /// Text alternative for the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(rename = "_display", skip_serializing_if = "Option::is_none")]
    pub display_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Reference {
    /// Literal reference such as `Patient/123` or `urn:uuid:...`
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }

    /// Resource type and id of a relative literal reference
    pub fn target(&self) -> Option<(&str, &str)> {
        let reference = self.reference.as_deref()?;
        let reference = match reference.find("/_history/") {
            Some(pos) => &reference[..pos],
            None => reference,
        };
        let mut parts = reference.rsplit('/');
        let id = parts.next()?;
        let resource_type = parts.next()?;
        if resource_type.is_empty() || id.is_empty() {
            return None;
        }
        Some((resource_type, id))
    }
}

crate::fhir_model!(Reference, "Reference");
crate::impl_element!(Reference);

crate::model_builder! {
    pub struct ReferenceBuilder => Reference {
        set set_reference(reference: String);
        set set_type(type_: String);
        set set_identifier(identifier: Box<Identifier>);
        set set_display(display: String);
    }
}

/// Time range defined by start and end date/time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(rename = "_start", skip_serializing_if = "Option::is_none")]
    pub start_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(rename = "_end", skip_serializing_if = "Option::is_none")]
    pub end_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Period {
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
            ..Default::default()
        }
    }

    pub fn starting(start: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Period, "Period");
crate::impl_element!(Period);

crate::model_builder! {
    pub struct PeriodBuilder => Period {
        set set_start(start: String);
        set set_end(end: String);
    }
}

/// How the Quantity should be understood and represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityComparator {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    /// R5 "sufficient to achieve this total quantity"
    #[serde(rename = "ad")]
    Ad,
}

/// A measured or measurable amount
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Numerical value (with implicit precision)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,

    #[serde(rename = "_value", skip_serializing_if = "Option::is_none")]
    pub value_ext: Option<Element>,

    /// < | <= | >= | > | ad - how to understand the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparator: Option<QuantityComparator>,

    #[serde(rename = "_comparator", skip_serializing_if = "Option::is_none")]
    pub comparator_ext: Option<Element>,

    /// Unit representation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(rename = "_unit", skip_serializing_if = "Option::is_none")]
    pub unit_ext: Option<Element>,

    /// System that defines coded unit form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(rename = "_system", skip_serializing_if = "Option::is_none")]
    pub system_ext: Option<Element>,

    /// Coded form of the unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(rename = "_code", skip_serializing_if = "Option::is_none")]
    pub code_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

impl Quantity {
    pub fn new(value: impl Into<Decimal>, unit: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            unit: Some(unit.into()),
            ..Default::default()
        }
    }

    /// Quantity with a UCUM-coded unit
    pub fn ucum(value: impl Into<Decimal>, code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            value: Some(value.into()),
            unit: Some(code.clone()),
            system: Some(UCUM_SYSTEM.to_string()),
            code: Some(code),
            ..Default::default()
        }
    }
}

pub type Age = Quantity;
pub type Count = Quantity;
pub type Distance = Quantity;
pub type Duration = Quantity;
pub type SimpleQuantity = Quantity;
pub type MoneyQuantity = Quantity;

crate::fhir_model!(Quantity, "Quantity");
crate::impl_element!(Quantity);

crate::model_builder! {
    pub struct QuantityBuilder => Quantity {
        set set_value(value: Decimal);
        set set_comparator(comparator: QuantityComparator);
        set set_unit(unit: String);
        set set_system(system: String);
        set set_code(code: String);
    }
}

/// Set of values bounded by low and high
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<SimpleQuantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<SimpleQuantity>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Range, "Range");
crate::impl_element!(Range);

crate::model_builder! {
    pub struct RangeBuilder => Range {
        set set_low(low: SimpleQuantity);
        set set_high(high: SimpleQuantity);
    }
}

/// A ratio of two Quantity values - a numerator and a denominator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub numerator: Option<Quantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub denominator: Option<SimpleQuantity>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Ratio, "Ratio");
crate::impl_element!(Ratio);

crate::model_builder! {
    pub struct RatioBuilder => Ratio {
        set set_numerator(numerator: Quantity);
        set set_denominator(denominator: SimpleQuantity);
    }
}

/// An amount of economic utility in some recognized currency
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,

    #[serde(rename = "_value", skip_serializing_if = "Option::is_none")]
    pub value_ext: Option<Element>,

    /// ISO 4217 Currency Code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(rename = "_currency", skip_serializing_if = "Option::is_none")]
    pub currency_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Money {
    pub fn new(value: impl Into<Decimal>, currency: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            currency: Some(currency.into()),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Money, "Money");
crate::impl_element!(Money);

crate::model_builder! {
    pub struct MoneyBuilder => Money {
        set set_value(value: Decimal);
        set set_currency(currency: String);
    }
}

/// Content in a format defined elsewhere.
///
/// `size` changed type between R4 (unsignedInt) and R5 (integer64) and is left
/// in `additional`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Mime type of the content, with charset etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(rename = "_contentType", skip_serializing_if = "Option::is_none")]
    pub content_type_ext: Option<Element>,

    /// Human language of the content (BCP-47)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "_language", skip_serializing_if = "Option::is_none")]
    pub language_ext: Option<Element>,

    /// Data inline, base64ed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(rename = "_data", skip_serializing_if = "Option::is_none")]
    pub data_ext: Option<Element>,

    /// Uri where the data can be found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "_url", skip_serializing_if = "Option::is_none")]
    pub url_ext: Option<Element>,

    /// Hash of the data (sha-1, base64ed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(rename = "_hash", skip_serializing_if = "Option::is_none")]
    pub hash_ext: Option<Element>,

    /// Label to display in place of the data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "_title", skip_serializing_if = "Option::is_none")]
    pub title_ext: Option<Element>,

    /// Date attachment was first created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation: Option<String>,

    #[serde(rename = "_creation", skip_serializing_if = "Option::is_none")]
    pub creation_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Attachment, "Attachment");
crate::impl_element!(Attachment);

crate::model_builder! {
    pub struct AttachmentBuilder => Attachment {
        set set_content_type(content_type: String);
        set set_language(language: String);
        set set_data(data: String);
        set set_url(url: String);
        set set_hash(hash: String);
        set set_title(title: String);
        set set_creation(creation: String);
    }
}

crate::choice_type! {
    /// Annotation.author[x]
    pub enum AnnotationAuthor("author") {
        Reference(Reference),
        String(Primitive<String>),
    }
}

/// Text node with attribution
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// When the annotation was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(rename = "_time", skip_serializing_if = "Option::is_none")]
    pub time_ext: Option<Element>,

    /// The annotation - text content (as markdown)
    pub text: String,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,

    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub author: Option<AnnotationAuthor>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Annotation, "Annotation", choices = [AnnotationAuthor]);
crate::impl_element!(Annotation);

crate::model_builder! {
    pub struct AnnotationBuilder => Annotation {
        set set_author(author: AnnotationAuthor);
        set set_time(time: String);
        req set_text(text: String);
    }
}

impl AnnotationBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self::from(Annotation::new(text))
    }
}

/// A digital signature along with supporting context
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Indication of the reason the entity signed the object(s)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<Coding>>,

    /// When the signature was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    #[serde(rename = "_when", skip_serializing_if = "Option::is_none")]
    pub when_ext: Option<Element>,

    /// Who signed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub who: Option<Reference>,

    /// The party represented
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_format: Option<String>,

    #[serde(rename = "_targetFormat", skip_serializing_if = "Option::is_none")]
    pub target_format_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig_format: Option<String>,

    #[serde(rename = "_sigFormat", skip_serializing_if = "Option::is_none")]
    pub sig_format_ext: Option<Element>,

    /// The actual signature content (XML DigSig, JWS, picture, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(rename = "_data", skip_serializing_if = "Option::is_none")]
    pub data_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Signature, "Signature");
crate::impl_element!(Signature);

crate::model_builder! {
    pub struct SignatureBuilder => Signature {
        add add_type(type_: Coding);
        set set_when(when: String);
        set set_who(who: Reference);
        set set_on_behalf_of(on_behalf_of: Reference);
        set set_target_format(target_format: String);
        set set_sig_format(sig_format: String);
        set set_data(data: String);
    }
}

/// A series of measurements taken by a device
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampledData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Zero value and units
    pub origin: SimpleQuantity,

    /// Milliseconds between samples (R4; replaced by `interval` in R5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Decimal>,

    #[serde(rename = "_period", skip_serializing_if = "Option::is_none")]
    pub period_ext: Option<Element>,

    /// Multiply data by this before adding to origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<Decimal>,

    #[serde(rename = "_factor", skip_serializing_if = "Option::is_none")]
    pub factor_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_limit: Option<Decimal>,

    #[serde(rename = "_lowerLimit", skip_serializing_if = "Option::is_none")]
    pub lower_limit_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_limit: Option<Decimal>,

    #[serde(rename = "_upperLimit", skip_serializing_if = "Option::is_none")]
    pub upper_limit_ext: Option<Element>,

    /// Number of sample points at each time point
    pub dimensions: u32,

    #[serde(rename = "_dimensions", skip_serializing_if = "Option::is_none")]
    pub dimensions_ext: Option<Element>,

    /// Decimal values with spaces, or "E" | "U" | "L"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(rename = "_data", skip_serializing_if = "Option::is_none")]
    pub data_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl SampledData {
    pub fn new(origin: SimpleQuantity, dimensions: u32) -> Self {
        Self {
            origin,
            dimensions,
            ..Default::default()
        }
    }
}

crate::fhir_model!(SampledData, "SampledData");
crate::impl_element!(SampledData);

crate::model_builder! {
    pub struct SampledDataBuilder => SampledData {
        req set_origin(origin: SimpleQuantity);
        set set_period(period: Decimal);
        set set_factor(factor: Decimal);
        set set_lower_limit(lower_limit: Decimal);
        set set_upper_limit(upper_limit: Decimal);
        req set_dimensions(dimensions: u32);
        set set_data(data: String);
    }
}

impl SampledDataBuilder {
    pub fn new(origin: SimpleQuantity, dimensions: u32) -> Self {
        Self::from(SampledData::new(origin, dimensions))
    }
}
