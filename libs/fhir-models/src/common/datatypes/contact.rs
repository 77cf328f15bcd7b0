//! Names, addresses and contact details

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CodeableConcept, Coding, Element, Extension, Period, Quantity, Range, Reference};

/// The use of a human name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameUse {
    Usual,
    Official,
    Temp,
    Nickname,
    Anonymous,
    Old,
    Maiden,
}

/// Name of a human or other living entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<NameUse>,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    /// Text representation of the full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,

    /// Family name (often called 'Surname')
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(rename = "_family", skip_serializing_if = "Option::is_none")]
    pub family_ext: Option<Element>,

    /// Given names (not always 'first'). Includes middle names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<Vec<String>>,

    #[serde(rename = "_given", skip_serializing_if = "Option::is_none")]
    pub given_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Vec<String>>,

    #[serde(rename = "_prefix", skip_serializing_if = "Option::is_none")]
    pub prefix_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<Vec<String>>,

    #[serde(rename = "_suffix", skip_serializing_if = "Option::is_none")]
    pub suffix_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl HumanName {
    pub fn new(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: Some(family.into()),
            given: Some(vec![given.into()]),
            ..Default::default()
        }
    }

    /// `text` if present, otherwise prefixes, given names, family and suffixes joined
    pub fn display(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        let parts = self
            .prefix
            .iter()
            .flatten()
            .chain(self.given.iter().flatten())
            .chain(self.family.iter())
            .chain(self.suffix.iter().flatten());
        parts.map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

crate::fhir_model!(HumanName, "HumanName");
crate::impl_element!(HumanName);

crate::model_builder! {
    pub struct HumanNameBuilder => HumanName {
        set set_use(use_: NameUse);
        set set_text(text: String);
        set set_family(family: String);
        add add_given(given: String);
        add add_prefix(prefix: String);
        add add_suffix(suffix: String);
        set set_period(period: Period);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressUse {
    Home,
    Work,
    Temp,
    Old,
    Billing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Postal,
    Physical,
    Both,
}

/// An address expressed using postal conventions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<AddressUse>,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<AddressType>,

    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub type_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,

    /// Street name, number, direction & P.O. Box etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Vec<String>>,

    #[serde(rename = "_line", skip_serializing_if = "Option::is_none")]
    pub line_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(rename = "_city", skip_serializing_if = "Option::is_none")]
    pub city_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    #[serde(rename = "_district", skip_serializing_if = "Option::is_none")]
    pub district_ext: Option<Element>,

    /// Sub-unit of country (abbreviations ok)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(rename = "_state", skip_serializing_if = "Option::is_none")]
    pub state_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(rename = "_postalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code_ext: Option<Element>,

    /// Country (e.g. may be ISO 3166 2 or 3 letter code)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(rename = "_country", skip_serializing_if = "Option::is_none")]
    pub country_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Address, "Address");
crate::impl_element!(Address);

crate::model_builder! {
    pub struct AddressBuilder => Address {
        set set_use(use_: AddressUse);
        set set_type(type_: AddressType);
        set set_text(text: String);
        add add_line(line: String);
        set set_city(city: String);
        set set_district(district: String);
        set set_state(state: String);
        set set_postal_code(postal_code: String);
        set set_country(country: String);
        set set_period(period: Period);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPointSystem {
    Phone,
    Fax,
    Email,
    Pager,
    Url,
    Sms,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPointUse {
    Home,
    Work,
    Temp,
    Old,
    Mobile,
}

/// Details of a technology mediated contact point (phone, fax, email, etc.)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<ContactPointSystem>,

    #[serde(rename = "_system", skip_serializing_if = "Option::is_none")]
    pub system_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "_value", skip_serializing_if = "Option::is_none")]
    pub value_ext: Option<Element>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<ContactPointUse>,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    /// Specify preferred order of use (1 = highest)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    #[serde(rename = "_rank", skip_serializing_if = "Option::is_none")]
    pub rank_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ContactPoint {
    pub fn new(system: ContactPointSystem, value: impl Into<String>) -> Self {
        Self {
            system: Some(system),
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ContactPoint, "ContactPoint");
crate::impl_element!(ContactPoint);

crate::model_builder! {
    pub struct ContactPointBuilder => ContactPoint {
        set set_system(system: ContactPointSystem);
        set set_value(value: String);
        set set_use(use_: ContactPointUse);
        set set_rank(rank: u32);
        set set_period(period: Period);
    }
}

/// Contact information
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Name of an individual to contact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "_name", skip_serializing_if = "Option::is_none")]
    pub name_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(ContactDetail, "ContactDetail");
crate::impl_element!(ContactDetail);

crate::model_builder! {
    pub struct ContactDetailBuilder => ContactDetail {
        set set_name(name: String);
        add add_telecom(telecom: ContactPoint);
    }
}

crate::choice_type! {
    /// UsageContext.value[x]
    pub enum UsageContextValue("value") {
        CodeableConcept(CodeableConcept),
        Quantity(Quantity),
        Range(Range),
        Reference(Reference),
    }
}

/// Describes the context of use for a conformance or knowledge resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// Type of context being specified
    pub code: Coding,

    /// Value that defines the context
    #[serde(flatten)]
    pub value: UsageContextValue,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Default for UsageContext {
    fn default() -> Self {
        Self {
            id: None,
            extension: None,
            code: Coding::default(),
            value: UsageContextValue::CodeableConcept(CodeableConcept::default()),
            additional: Map::new(),
        }
    }
}

crate::fhir_model!(UsageContext, "UsageContext", choices = [UsageContextValue]);
crate::impl_element!(UsageContext);

crate::model_builder! {
    pub struct UsageContextBuilder => UsageContext {
        req set_code(code: Coding);
        req set_value(value: UsageContextValue);
    }
}

impl UsageContextBuilder {
    pub fn new(code: Coding, value: UsageContextValue) -> Self {
        Self::from(UsageContext {
            code,
            value,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::builder::ModelBuilder;
    use crate::common::model::FhirModel;
    use serde_json::json;

    #[test]
    fn test_human_name_display() {
        let name = HumanNameBuilder::default()
            .set_family("Chalmers")
            .add_given("Peter")
            .add_given("James")
            .add_prefix("Mr.")
            .build();
        assert_eq!(name.display(), "Mr. Peter James Chalmers");

        let texted = name.with(|n| n.text = Some("Jim".into()));
        assert_eq!(texted.display(), "Jim");
    }

    #[test]
    fn test_given_sidecars_align() {
        let json = json!({
            "family": "Windsor",
            "given": ["Peter", "James"],
            "_given": [null, {"extension": [{"url": "http://example.org/x", "valueCode": "NICK"}]}]
        });
        let name = HumanName::from_json(&json).unwrap();
        assert_eq!(name.given_ext.as_ref().map(Vec::len), Some(2));
        assert_eq!(name.to_json().unwrap(), json);
    }

    #[test]
    fn test_required_usage_context_value() {
        let missing = UsageContext::from_json(&json!({
            "code": {"system": "http://terminology.hl7.org/CodeSystem/usage-context-type", "code": "focus"}
        }));
        assert!(missing.is_err());

        let json = json!({
            "code": {"system": "http://terminology.hl7.org/CodeSystem/usage-context-type", "code": "age"},
            "valueRange": {"low": {"value": 18.5}, "high": {"value": 65.5}}
        });
        let context = UsageContext::from_json(&json).unwrap();
        assert!(matches!(context.value, UsageContextValue::Range(_)));
        assert_eq!(context.to_json().unwrap(), json);
    }

    #[test]
    fn test_contact_point_codes() {
        let json = json!({"system": "phone", "value": "(03) 5555 6473", "use": "work", "rank": 1});
        let telecom = ContactPoint::from_json(&json).unwrap();
        assert_eq!(telecom.system, Some(ContactPointSystem::Phone));
        assert_eq!(telecom.use_, Some(ContactPointUse::Work));
        assert_eq!(telecom.to_json().unwrap(), json);
    }
}
