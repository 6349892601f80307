use std::{fmt, str::FromStr};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use super::{Element, MetadataError, ModelDescription, UnknownVariant, Variable};

/// The inputs an unknown depends on.
///
/// `Unspecified` is a modeling statement: the unknown may depend on every
/// known, with no structure given. It is not the same as depending on nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum Dependencies {
    #[default]
    Unspecified,

    /// 1-based variable indices, in declaration order.
    Explicit(Vec<usize>),
}

impl Dependencies {
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }

    /// Returns the explicit index list, if there is one.
    pub fn indices(&self) -> Option<&[usize]> {
        match self {
            Self::Unspecified => None,
            Self::Explicit(indices) => Some(indices),
        }
    }
}

/// How an unknown depends on its listed knowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-derive", serde(rename_all = "camelCase"))]
pub enum DependenciesKind {
    Dependent,
    Constant,
    Fixed,
    Tunable,
    Discrete,
}

impl DependenciesKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dependent => "dependent",
            Self::Constant => "constant",
            Self::Fixed => "fixed",
            Self::Tunable => "tunable",
            Self::Discrete => "discrete",
        }
    }
}

impl FromStr for DependenciesKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dependent" => Ok(Self::Dependent),
            "constant" => Ok(Self::Constant),
            "fixed" => Ok(Self::Fixed),
            "tunable" => Ok(Self::Tunable),
            "discrete" => Ok(Self::Discrete),
            _ => Err(UnknownVariant {
                kind: "dependencies kind",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DependenciesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dependency record from the model structure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Unknown {
    /// 1-based index into the model variables.
    pub index: usize,
    pub dependencies: Dependencies,

    /// Only kept when `dependencies` is explicit.
    pub dependencies_kind: Option<DependenciesKind>,
}

impl Unknown {
    /// Builds an unknown from an `Unknown` element.
    ///
    /// An absent and an empty `dependencies` attribute both yield
    /// [`Dependencies::Unspecified`].
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if `index` is missing or not a positive
    /// integer, or if `dependencies` or `dependenciesKind` cannot be parsed.
    pub fn from_element(element: &Element) -> Result<Self, MetadataError> {
        element.expect_name("Unknown")?;

        let index = positive_index(element, "index", element.required_attribute("index")?)?;

        let indices = element
            .attribute("dependencies")
            .map(|raw| {
                raw.split_whitespace()
                    .map(|token| positive_index(element, "dependencies", token))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        if indices.is_empty() {
            return Ok(Self {
                index,
                dependencies: Dependencies::Unspecified,
                dependencies_kind: None,
            });
        }

        Ok(Self {
            index,
            dependencies: Dependencies::Explicit(indices),
            dependencies_kind: element.parse_attribute("dependenciesKind")?,
        })
    }

    /// Resolves the variable this unknown refers to.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::IndexOutOfRange`] if the index does not name
    /// a variable of `description`.
    pub fn variable<'a>(
        &self,
        description: &'a ModelDescription,
    ) -> Result<&'a Variable, MetadataError> {
        description.variable_at(self.index)
    }
}

fn positive_index(
    element: &Element,
    key: &'static str,
    token: &str,
) -> Result<usize, MetadataError> {
    match token.trim().parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        Ok(_) => Err(element.invalid(key, token, "indices are 1-based")),
        Err(err) => Err(element.invalid(key, token, err.to_string())),
    }
}
