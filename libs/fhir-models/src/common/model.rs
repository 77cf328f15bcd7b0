//! Model traits shared by every FHIR type
//!
//! FHIR's base hierarchy (Element → BackboneElement, Resource → DomainResource)
//! is expressed as traits implemented by the `impl_*` macros below. Concrete
//! types are plain structs; there is no runtime inheritance.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

use super::choice::{self, ChoiceGroup};
use super::datatypes::{Extension, Meta, Narrative};
use super::error::{Error, Result};

/// JSON round-tripping and immutable-update helpers
pub trait FhirModel: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug {
    /// FHIR type name, or element path for backbone elements (`Patient.contact`)
    const TYPE_NAME: &'static str;

    /// Choice elements declared directly on this type
    const CHOICES: &'static [ChoiceGroup] = &[];

    /// Parse from JSON Value
    fn from_json(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(Error::from)
    }

    /// Parse from a JSON string
    fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::from)
    }

    /// Convert to JSON Value
    fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }

    fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    /// Copy with changes applied; the receiver is left untouched
    fn with<F>(&self, changes: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut next = self.clone();
        changes(&mut next);
        next
    }

    /// Copy with a JSON object of member changes merged in.
    ///
    /// Members are replaced wholesale; `null` removes a member and nothing
    /// else. Writing one variant of a choice element removes its sibling
    /// variants and their sidecars.
    fn with_json(&self, changes: &Value) -> Result<Self> {
        let changes = changes
            .as_object()
            .ok_or(Error::ExpectedObject(Self::TYPE_NAME))?;
        let mut merged = match self.to_json()? {
            Value::Object(map) => map,
            _ => return Err(Error::ExpectedObject(Self::TYPE_NAME)),
        };

        for (key, value) in changes {
            if value.is_null() {
                merged.remove(key);
                continue;
            }
            for group in Self::CHOICES {
                if let Some((tag, _)) = group.match_key(key) {
                    choice::clear_siblings(&mut merged, group, tag);
                }
            }
            merged.insert(key.clone(), value.clone());
        }

        tracing::trace!(
            type_name = Self::TYPE_NAME,
            changed = changes.len(),
            "merged JSON changes"
        );
        Self::from_json(&Value::Object(merged))
    }

    /// Pass a copy through `transform`
    fn apply_transform<F>(&self, transform: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        transform(self.clone())
    }
}

/// Types carrying `extension`
pub trait HasExtensions {
    fn extension_opt(&self) -> &Option<Vec<Extension>>;
    fn extension_opt_mut(&mut self) -> &mut Option<Vec<Extension>>;

    fn extensions(&self) -> &[Extension] {
        self.extension_opt().as_deref().unwrap_or(&[])
    }

    fn extensions_mut(&mut self) -> &mut Vec<Extension> {
        self.extension_opt_mut().get_or_insert_with(Vec::new)
    }

    fn extension_by_url(&self, url: &str) -> Option<&Extension> {
        self.extensions().iter().find(|ext| ext.url == url)
    }

    fn add_extension(&mut self, extension: Extension) {
        self.extensions_mut().push(extension);
    }
}

/// Types carrying `modifierExtension`
pub trait HasModifierExtensions {
    fn modifier_extension_opt(&self) -> &Option<Vec<Extension>>;
    fn modifier_extension_opt_mut(&mut self) -> &mut Option<Vec<Extension>>;

    fn modifier_extensions(&self) -> &[Extension] {
        self.modifier_extension_opt().as_deref().unwrap_or(&[])
    }

    fn modifier_extensions_mut(&mut self) -> &mut Vec<Extension> {
        self.modifier_extension_opt_mut().get_or_insert_with(Vec::new)
    }

    fn add_modifier_extension(&mut self, extension: Extension) {
        self.modifier_extensions_mut().push(extension);
    }
}

/// FHIR `Element`: every datatype and backbone element
pub trait ElementBase: HasExtensions {
    fn element_id(&self) -> Option<&str>;
}

/// FHIR `BackboneElement`
pub trait BackboneElementBase: ElementBase + HasModifierExtensions {}

/// FHIR `Resource`
pub trait ResourceBase {
    const RESOURCE_TYPE: &'static str;

    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: Option<String>);
    fn meta(&self) -> Option<&Meta>;
    fn meta_mut(&mut self) -> &mut Meta;
    fn language(&self) -> Option<&str>;

    /// Relative reference to this resource (`Patient/123`)
    fn local_reference(&self) -> Option<String> {
        self.id()
            .map(|id| format!("{}/{}", Self::RESOURCE_TYPE, id))
    }
}

/// FHIR `DomainResource`
pub trait DomainResourceBase: ResourceBase + HasExtensions + HasModifierExtensions {
    /// Resource union used for `contained`
    type Contained;

    fn text(&self) -> Option<&Narrative>;
    fn contained(&self) -> &[Self::Contained];
}

/// The `resourceType` member of a resource.
///
/// Zero-sized: it always serializes to `T::RESOURCE_TYPE`. Deserialization
/// rejects any other resource type.
pub struct ResourceTag<T>(PhantomData<fn() -> T>);

impl<T> ResourceTag<T> {
    pub const fn new() -> Self {
        ResourceTag(PhantomData)
    }
}

impl<T> Default for ResourceTag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ResourceTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ResourceTag<T> {}

impl<T> PartialEq for ResourceTag<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for ResourceTag<T> {}

impl<T: ResourceBase> fmt::Debug for ResourceTag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::RESOURCE_TYPE)
    }
}

impl<T: ResourceBase> Serialize for ResourceTag<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(T::RESOURCE_TYPE)
    }
}

impl<'de, T: ResourceBase> Deserialize<'de> for ResourceTag<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let found = String::deserialize(deserializer)?;
        if found == T::RESOURCE_TYPE {
            Ok(ResourceTag::new())
        } else {
            Err(de::Error::custom(Error::ResourceTypeMismatch {
                expected: T::RESOURCE_TYPE,
                found,
            }))
        }
    }
}

/// Implements [`FhirModel`] and `Display` (compact JSON)
#[macro_export]
macro_rules! fhir_model {
    ($ty:ty, $name:literal) => {
        $crate::fhir_model!($ty, $name, choices = []);
    };
    ($ty:ty, $name:literal, choices = [$($choice:ty),* $(,)?]) => {
        impl $crate::model::FhirModel for $ty {
            const TYPE_NAME: &'static str = $name;
            const CHOICES: &'static [$crate::choice::ChoiceGroup] =
                &[$(<$choice as $crate::choice::ChoiceType>::GROUP),*];
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let json = $crate::__private::serde_json::to_string(self)
                    .map_err(|_| ::std::fmt::Error)?;
                f.write_str(&json)
            }
        }
    };
}

/// Implements [`ElementBase`] for a struct with `id` and `extension` fields
#[macro_export]
macro_rules! impl_element {
    ($ty:ty) => {
        impl $crate::model::HasExtensions for $ty {
            fn extension_opt(
                &self,
            ) -> &::std::option::Option<::std::vec::Vec<$crate::datatypes::Extension>> {
                &self.extension
            }

            fn extension_opt_mut(
                &mut self,
            ) -> &mut ::std::option::Option<::std::vec::Vec<$crate::datatypes::Extension>> {
                &mut self.extension
            }
        }

        impl $crate::model::ElementBase for $ty {
            fn element_id(&self) -> ::std::option::Option<&str> {
                self.id.as_deref()
            }
        }
    };
}

/// Implements [`BackboneElementBase`] (adds `modifierExtension`)
#[macro_export]
macro_rules! impl_backbone_element {
    ($ty:ty) => {
        $crate::impl_element!($ty);
        $crate::impl_modifier_extensions!($ty);

        impl $crate::model::BackboneElementBase for $ty {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! impl_modifier_extensions {
    ($ty:ty) => {
        impl $crate::model::HasModifierExtensions for $ty {
            fn modifier_extension_opt(
                &self,
            ) -> &::std::option::Option<::std::vec::Vec<$crate::datatypes::Extension>> {
                &self.modifier_extension
            }

            fn modifier_extension_opt_mut(
                &mut self,
            ) -> &mut ::std::option::Option<::std::vec::Vec<$crate::datatypes::Extension>> {
                &mut self.modifier_extension
            }
        }
    };
}

/// Implements [`ResourceBase`]
#[macro_export]
macro_rules! impl_resource {
    ($ty:ty, $resource_type:literal) => {
        impl $crate::model::ResourceBase for $ty {
            const RESOURCE_TYPE: &'static str = $resource_type;

            fn id(&self) -> ::std::option::Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: ::std::option::Option<::std::string::String>) {
                self.id = id;
            }

            fn meta(&self) -> ::std::option::Option<&$crate::datatypes::Meta> {
                self.meta.as_ref()
            }

            fn meta_mut(&mut self) -> &mut $crate::datatypes::Meta {
                self.meta.get_or_insert_with(::std::default::Default::default)
            }

            fn language(&self) -> ::std::option::Option<&str> {
                self.language.as_deref()
            }
        }
    };
}

/// Implements [`DomainResourceBase`] and everything below it
#[macro_export]
macro_rules! impl_domain_resource {
    ($ty:ty, $resource_type:literal, contained = $contained:ty) => {
        $crate::impl_resource!($ty, $resource_type);
        $crate::impl_modifier_extensions!($ty);

        impl $crate::model::HasExtensions for $ty {
            fn extension_opt(
                &self,
            ) -> &::std::option::Option<::std::vec::Vec<$crate::datatypes::Extension>> {
                &self.extension
            }

            fn extension_opt_mut(
                &mut self,
            ) -> &mut ::std::option::Option<::std::vec::Vec<$crate::datatypes::Extension>> {
                &mut self.extension
            }
        }

        impl $crate::model::DomainResourceBase for $ty {
            type Contained = $contained;

            fn text(&self) -> ::std::option::Option<&$crate::datatypes::Narrative> {
                self.text.as_ref()
            }

            fn contained(&self) -> &[$contained] {
                self.contained.as_deref().unwrap_or(&[])
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::datatypes::{Coding, Identifier, Period};
    use serde_json::json;

    #[test]
    fn test_with_leaves_receiver_untouched() {
        let coding = Coding::new("http://loinc.org", "8867-4");
        let changed = coding.with(|c| c.display = Some("Heart rate".into()));

        assert!(coding.display.is_none());
        assert_eq!(changed.display.as_deref(), Some("Heart rate"));
        assert_eq!(changed.code, coding.code);
    }

    #[test]
    fn test_with_json_merges_and_removes() {
        let identifier = Identifier {
            system: Some("urn:oid:1.2.36.146.595.217.0.1".into()),
            value: Some("12345".into()),
            period: Some(Period::between("2001-05-06", "2010-01-01")),
            ..Default::default()
        };

        let changed = identifier
            .with_json(&json!({"value": "67890", "period": null}))
            .unwrap();

        assert_eq!(changed.value.as_deref(), Some("67890"));
        assert!(changed.period.is_none());
        assert_eq!(changed.system, identifier.system);
        assert_eq!(identifier.value.as_deref(), Some("12345"));
    }

    #[test]
    fn test_with_json_requires_object() {
        let coding = Coding::default();
        assert!(matches!(
            coding.with_json(&json!(["code"])),
            Err(Error::ExpectedObject("Coding"))
        ));
    }

    #[test]
    fn test_apply_transform() {
        let coding = Coding::new("http://snomed.info/sct", "22298006");
        let upper = coding.apply_transform(|mut c| {
            c.system = c.system.map(|s| s.to_uppercase());
            c
        });
        assert_eq!(upper.system.as_deref(), Some("HTTP://SNOMED.INFO/SCT"));
        assert_eq!(coding.system.as_deref(), Some("http://snomed.info/sct"));
    }

    #[test]
    fn test_display_is_compact_json() {
        let coding = Coding::new("http://loinc.org", "8867-4");
        assert_eq!(
            coding.to_string(),
            r#"{"system":"http://loinc.org","code":"8867-4"}"#
        );
    }

    #[test]
    fn test_extension_helpers() {
        let mut coding = Coding::default();
        assert!(coding.extensions().is_empty());

        coding.add_extension(Extension::new("http://example.org/a"));
        assert_eq!(coding.extensions().len(), 1);
        assert!(coding.extension_by_url("http://example.org/a").is_some());
        assert!(coding.extension_by_url("http://example.org/b").is_none());
    }
}
