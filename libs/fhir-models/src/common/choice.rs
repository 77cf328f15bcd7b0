//! Choice elements (`value[x]`)
//!
//! A FHIR choice element is written as one of several same-prefixed members:
//! `valueQuantity`, `valueString`, `valueBoolean`, ... Exactly one may be
//! present. Each choice element is modeled as an enum declared with
//! [`choice_type!`](crate::choice_type), which flattens into its owning struct.
//!
//! The JSON-level helpers ([`set_choice`], [`clear_siblings`]) apply the same
//! rule to raw objects: setting one variant removes every sibling variant and
//! its `_` sidecar.

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;

use super::datatypes::Element;
use super::error::{Error, Result};
use super::primitive::Primitive;

/// The closed set of variants of one choice element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceGroup {
    /// Member name without the type suffix (`value` for `value[x]`)
    pub prefix: &'static str,
    /// Type suffixes in declaration order (`Quantity`, `String`, ...)
    pub tags: &'static [&'static str],
}

impl ChoiceGroup {
    /// JSON member name of a variant (`valueQuantity`)
    pub fn key(&self, tag: &str) -> String {
        format!("{}{}", self.prefix, tag)
    }

    /// JSON member name of a variant's sidecar (`_valueString`)
    pub fn sidecar_key(&self, tag: &str) -> String {
        format!("_{}{}", self.prefix, tag)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }

    /// Resolve a JSON member name to its variant tag.
    ///
    /// Returns the tag and whether the member is the `_` sidecar.
    pub fn match_key(&self, key: &str) -> Option<(&'static str, bool)> {
        let (rest, sidecar) = match key.strip_prefix('_') {
            Some(rest) => (rest, true),
            None => (key, false),
        };
        let suffix = rest.strip_prefix(self.prefix)?;
        self.tags
            .iter()
            .find(|tag| **tag == suffix)
            .map(|tag| (*tag, sidecar))
    }
}

/// An enum modeling one choice element
pub trait ChoiceType: Sized {
    /// Element name as written in StructureDefinitions (`value[x]`)
    const NAME: &'static str;
    const PREFIX: &'static str;
    const TAGS: &'static [&'static str];
    /// Every JSON member the choice may occupy, sidecars included
    const FIELDS: &'static [&'static str];
    const GROUP: ChoiceGroup = ChoiceGroup {
        prefix: Self::PREFIX,
        tags: Self::TAGS,
    };

    /// Type suffix of the populated variant
    fn tag(&self) -> &'static str;

    /// Build a variant from the JSON value and sidecar found under its members
    fn from_parts(tag: &str, value: Option<Value>, sidecar: Option<Value>) -> Result<Self>;

    /// Split the populated variant into its JSON value and sidecar
    fn to_parts(&self) -> Result<(Option<Value>, Option<Value>)>;

    /// Select a variant by tag, decoding `value` as that variant's type
    fn from_tagged(tag: &str, value: Value) -> Result<Self> {
        Self::from_parts(tag, Some(value), None)
    }

    /// JSON member name of the populated variant
    fn key(&self) -> String {
        Self::GROUP.key(self.tag())
    }
}

/// A type that can sit inside a choice variant
pub trait ChoiceValue: Sized {
    fn decode(field: &'static str, value: Option<Value>, sidecar: Option<Value>) -> Result<Self>;
    fn encode(&self) -> Result<(Option<Value>, Option<Value>)>;
}

impl<T> ChoiceValue for Primitive<T>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    fn decode(_field: &'static str, value: Option<Value>, sidecar: Option<Value>) -> Result<Self> {
        let value = value.map(serde_json::from_value).transpose()?;
        let element = sidecar
            .map(serde_json::from_value::<Element>)
            .transpose()?;
        Ok(Primitive { value, element })
    }

    fn encode(&self) -> Result<(Option<Value>, Option<Value>)> {
        let value = self.value.as_ref().map(serde_json::to_value).transpose()?;
        let element = self.element.as_ref().map(serde_json::to_value).transpose()?;
        Ok((value, element))
    }
}

/// Unmodeled complex types (e.g. `Expression`) travel as raw JSON
impl ChoiceValue for Value {
    fn decode(field: &'static str, value: Option<Value>, sidecar: Option<Value>) -> Result<Self> {
        decode_complex(field, value, sidecar)
    }

    fn encode(&self) -> Result<(Option<Value>, Option<Value>)> {
        Ok((Some(self.clone()), None))
    }
}

#[doc(hidden)]
pub fn decode_complex<T: serde::de::DeserializeOwned>(
    field: &'static str,
    value: Option<Value>,
    sidecar: Option<Value>,
) -> Result<T> {
    if sidecar.is_some() {
        return Err(Error::InvalidFieldValue(format!(
            "{} carries an extension sidecar on a complex variant",
            field
        )));
    }
    let value = value.ok_or_else(|| Error::MissingField(field.to_string()))?;
    Ok(serde_json::from_value(value)?)
}

/// Implements [`ChoiceValue`] for complex datatypes
#[macro_export]
macro_rules! complex_choice_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::choice::ChoiceValue for $ty {
                fn decode(
                    field: &'static str,
                    value: ::std::option::Option<$crate::__private::serde_json::Value>,
                    sidecar: ::std::option::Option<$crate::__private::serde_json::Value>,
                ) -> $crate::Result<Self> {
                    $crate::choice::decode_complex(field, value, sidecar)
                }

                fn encode(
                    &self,
                ) -> $crate::Result<(
                    ::std::option::Option<$crate::__private::serde_json::Value>,
                    ::std::option::Option<$crate::__private::serde_json::Value>,
                )> {
                    ::std::result::Result::Ok((
                        ::std::option::Option::Some($crate::__private::serde_json::to_value(self)?),
                        ::std::option::Option::None,
                    ))
                }
            }
        )+
    };
}

/// Declares a choice enum with its wire mapping.
///
/// Variant names are the FHIR type suffixes; the JSON member is the prefix
/// followed by the variant name.
///
/// ```rust
/// use fhirbind_models::choice_type;
/// use fhirbind_models::prelude::*;
///
/// choice_type! {
///     /// Example.value[x]
///     pub enum ExampleValue("value") {
///         Quantity(Quantity),
///         String(Primitive<String>),
///     }
/// }
///
/// let value = ExampleValue::String("text".into());
/// assert_eq!(value.key(), "valueString");
/// ```
#[macro_export]
macro_rules! choice_type {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($prefix:literal) {
            $( $(#[$vmeta:meta])* $variant:ident($ty:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($ty), )+
        }

        impl $crate::choice::ChoiceType for $name {
            const NAME: &'static str = concat!($prefix, "[x]");
            const PREFIX: &'static str = $prefix;
            const TAGS: &'static [&'static str] = &[$(stringify!($variant)),+];
            const FIELDS: &'static [&'static str] = &[
                $( concat!($prefix, stringify!($variant)), concat!("_", $prefix, stringify!($variant)), )+
            ];

            fn tag(&self) -> &'static str {
                match self {
                    $( $name::$variant(_) => stringify!($variant), )+
                }
            }

            fn from_parts(
                tag: &str,
                value: ::std::option::Option<$crate::__private::serde_json::Value>,
                sidecar: ::std::option::Option<$crate::__private::serde_json::Value>,
            ) -> $crate::Result<Self> {
                $(
                    if tag == stringify!($variant) {
                        return ::std::result::Result::Ok($name::$variant(
                            <$ty as $crate::choice::ChoiceValue>::decode(
                                <Self as $crate::choice::ChoiceType>::NAME,
                                value,
                                sidecar,
                            )?,
                        ));
                    }
                )+
                ::std::result::Result::Err($crate::Error::UnknownChoiceTag {
                    field: <Self as $crate::choice::ChoiceType>::NAME,
                    tag: tag.to_string(),
                })
            }

            fn to_parts(
                &self,
            ) -> $crate::Result<(
                ::std::option::Option<$crate::__private::serde_json::Value>,
                ::std::option::Option<$crate::__private::serde_json::Value>,
            )> {
                match self {
                    $( $name::$variant(inner) => $crate::choice::ChoiceValue::encode(inner), )+
                }
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::choice::serialize(self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::choice::deserialize_required(deserializer)
            }
        }
    };
}

/// Writes the populated variant as its member(s) of the enclosing object
pub fn serialize<T, S>(choice: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: ChoiceType,
    S: Serializer,
{
    let (value, sidecar) = choice.to_parts().map_err(Error::into_ser_error)?;
    let tag = choice.tag();
    let mut map = serializer.serialize_map(None)?;
    if let Some(value) = value {
        map.serialize_entry(&T::GROUP.key(tag), &value)?;
    }
    if let Some(sidecar) = sidecar {
        map.serialize_entry(&T::GROUP.sidecar_key(tag), &sidecar)?;
    }
    map.end()
}

/// Reads a choice that must be present
pub fn deserialize_required<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: ChoiceType,
    D: Deserializer<'de>,
{
    deserializer
        .deserialize_struct(T::NAME, T::FIELDS, ChoiceVisitor::<T>(PhantomData))?
        .ok_or_else(|| de::Error::missing_field(T::NAME))
}

/// Reads an optional choice.
///
/// Use as `#[serde(flatten, deserialize_with = "...::choice::optional")]` on an
/// `Option<_>` field so that conflicting variants are reported instead of
/// silently dropped.
pub fn optional<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: ChoiceType,
    D: Deserializer<'de>,
{
    deserializer.deserialize_struct(T::NAME, T::FIELDS, ChoiceVisitor::<T>(PhantomData))
}

struct ChoiceVisitor<T>(PhantomData<T>);

impl<'de, T: ChoiceType> Visitor<'de> for ChoiceVisitor<T> {
    type Value = Option<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "members of choice element {}", T::NAME)
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // (tag, value, sidecar)
        let mut found: Vec<(&'static str, Option<Value>, Option<Value>)> = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            let Some((tag, is_sidecar)) = T::GROUP.match_key(&key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            let content: Value = map.next_value()?;
            let index = match found.iter().position(|(t, _, _)| *t == tag) {
                Some(index) => index,
                None => {
                    found.push((tag, None, None));
                    found.len() - 1
                }
            };
            let slot = &mut found[index];
            if is_sidecar {
                slot.2 = Some(content);
            } else {
                slot.1 = Some(content);
            }
        }

        match found.len() {
            0 => Ok(None),
            1 => {
                let (tag, value, sidecar) = found.remove(0);
                T::from_parts(tag, value, sidecar)
                    .map(Some)
                    .map_err(Error::into_de_error)
            }
            _ => Err(de::Error::custom(Error::ConflictingChoice {
                field: T::NAME,
                tags: found.iter().map(|(tag, _, _)| *tag).collect(),
            })),
        }
    }
}

/// Remove every variant of `group` other than `keep`, sidecars included
pub fn clear_siblings(object: &mut Map<String, Value>, group: &ChoiceGroup, keep: &str) {
    for tag in group.tags.iter().filter(|tag| **tag != keep) {
        object.remove(&group.key(tag));
        object.remove(&group.sidecar_key(tag));
    }
}

/// Set one variant of a choice element on a raw JSON object.
///
/// Writes `{prefix}{tag}` and removes every sibling variant and its sidecar.
/// The variant's own sidecar, if any, is kept.
pub fn set_choice(
    object: &mut Map<String, Value>,
    group: &ChoiceGroup,
    tag: &str,
    value: Value,
) -> Result<()> {
    if !group.has_tag(tag) {
        return Err(Error::UnknownChoiceTag {
            field: group.prefix,
            tag: tag.to_string(),
        });
    }
    clear_siblings(object, group, tag);
    object.insert(group.key(tag), value);
    Ok(())
}

/// Tags of `group` that currently have a value or a sidecar in `object`
pub fn present_tags(object: &Map<String, Value>, group: &ChoiceGroup) -> Vec<&'static str> {
    group
        .tags
        .iter()
        .filter(|tag| {
            object.contains_key(&group.key(tag)) || object.contains_key(&group.sidecar_key(tag))
        })
        .copied()
        .collect()
}
