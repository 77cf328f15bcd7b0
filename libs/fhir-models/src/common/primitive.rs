//! Primitive values paired with their extension sidecar
//!
//! In FHIR JSON a primitive `birthDate` may carry an `_birthDate` object with
//! an element id and extensions. Struct fields model the two halves as
//! `birth_date` and `birth_date_ext`. Choice variants cannot split that way, so
//! they hold a [`Primitive`].

use super::datatypes::Element;

/// A primitive value and its optional `_field` sidecar
///
/// Either half may be absent: FHIR allows a primitive that only carries
/// extensions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Primitive<T> {
    pub value: Option<T>,
    pub element: Option<Element>,
}

impl<T> Primitive<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Some(value),
            element: None,
        }
    }

    /// A primitive that only carries an element id and/or extensions
    pub fn extension_only(element: Element) -> Self {
        Self {
            value: None,
            element: Some(element),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

impl<T> From<T> for Primitive<T> {
    fn from(value: T) -> Self {
        Primitive::new(value)
    }
}

impl From<&str> for Primitive<String> {
    fn from(value: &str) -> Self {
        Primitive::new(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::datatypes::Extension;

    #[test]
    fn test_extension_only_primitive() {
        let element = Element {
            extension: Some(vec![Extension::new(
                "http://hl7.org/fhir/StructureDefinition/data-absent-reason",
            )]),
            ..Default::default()
        };
        let primitive: Primitive<String> = Primitive::extension_only(element);
        assert!(primitive.value().is_none());
        assert!(primitive.element.is_some());
    }

    #[test]
    fn test_from_str() {
        let primitive: Primitive<String> = "hello".into();
        assert_eq!(primitive.value().map(String::as_str), Some("hello"));
    }
}
