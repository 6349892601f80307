use std::{collections::BTreeMap, fmt::Display, str::FromStr};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use super::MetadataError;

/// A generic, already-parsed element of the model description tree.
///
/// Reading the description from disk is left to the caller; any structured
/// reader that can produce named elements with string attributes and ordered
/// children can feed [`ModelDescription::from_element`](super::ModelDescription::from_element).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Element {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the element with `key` set to `value`.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the element with `child` appended.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the raw value of an attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Iterates over the children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub(crate) fn expect_name(&self, expected: &'static str) -> Result<(), MetadataError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(MetadataError::UnexpectedElement {
                expected,
                found: self.name.clone(),
            })
        }
    }

    pub(crate) fn required_attribute(&self, key: &'static str) -> Result<&str, MetadataError> {
        self.attribute(key)
            .ok_or_else(|| MetadataError::MissingAttribute {
                element: self.name.clone(),
                attribute: key,
            })
    }

    /// Parses an optional attribute with [`FromStr`].
    pub(crate) fn parse_attribute<T>(&self, key: &'static str) -> Result<Option<T>, MetadataError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.attribute(key)
            .map(|raw| self.parse_value(key, raw))
            .transpose()
    }

    pub(crate) fn parse_required<T>(&self, key: &'static str) -> Result<T, MetadataError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.required_attribute(key)?;
        self.parse_value(key, raw)
    }

    /// Parses an optional `xs:boolean` attribute, which also admits `1` and `0`.
    pub(crate) fn bool_attribute(&self, key: &'static str) -> Result<Option<bool>, MetadataError> {
        self.attribute(key)
            .map(|raw| match raw.trim() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(self.invalid(key, other, "expected a boolean")),
            })
            .transpose()
    }

    pub(crate) fn invalid(
        &self,
        key: &'static str,
        value: &str,
        reason: impl Into<String>,
    ) -> MetadataError {
        MetadataError::InvalidAttribute {
            element: self.name.clone(),
            attribute: key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    fn parse_value<T>(&self, key: &'static str, raw: &str) -> Result<T, MetadataError>
    where
        T: FromStr,
        T::Err: Display,
    {
        raw.trim()
            .parse()
            .map_err(|err: T::Err| self.invalid(key, raw, err.to_string()))
    }
}
