use std::fmt;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::ValueReference;

use super::{Causality, Element, Initial, MetadataError, TypeMismatch, Variability};

/// The declared base type of a [`Variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum VariableType {
    Integer,
    Real,
    String,
    Boolean,
}

impl VariableType {
    /// Returns the element name used for this type in the model description.
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Real => "Real",
            Self::String => "String",
            Self::Boolean => "Boolean",
        }
    }

    fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "Integer" => Some(Self::Integer),
            "Real" => Some(Self::Real),
            "String" => Some(Self::String),
            "Boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct IntegerAttributes {
    pub start: Option<i32>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct RealAttributes {
    pub start: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,

    /// Nominal magnitude; `1.0` is assumed when absent.
    pub nominal: Option<f64>,

    /// The value grows much larger than `nominal` during integration.
    pub unbounded: Option<bool>,

    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub display_unit: Option<String>,

    /// The display-unit offset must be ignored.
    pub relative_quantity: Option<bool>,

    /// 1-based index of the state this variable is the derivative of.
    pub derivative: Option<usize>,

    /// The model may reinitialize this state at an event.
    pub reinit: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct StringAttributes {
    pub start: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct BooleanAttributes {
    pub start: Option<bool>,
}

/// The type-specific part of a [`Variable`].
///
/// A variable has exactly one of these; views of another type fail with
/// [`TypeMismatch`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum TypedAttributes {
    Integer(IntegerAttributes),
    Real(RealAttributes),
    String(StringAttributes),
    Boolean(BooleanAttributes),
}

impl TypedAttributes {
    pub fn variable_type(&self) -> VariableType {
        match self {
            Self::Integer(_) => VariableType::Integer,
            Self::Real(_) => VariableType::Real,
            Self::String(_) => VariableType::String,
            Self::Boolean(_) => VariableType::Boolean,
        }
    }

    fn from_element(element: &Element) -> Result<Self, MetadataError> {
        let attributes = match element.name.as_str() {
            "Integer" => Self::Integer(IntegerAttributes {
                start: element.parse_attribute("start")?,
                min: element.parse_attribute("min")?,
                max: element.parse_attribute("max")?,
                quantity: element.attribute("quantity").map(str::to_string),
            }),
            "Real" => Self::Real(RealAttributes {
                start: element.parse_attribute("start")?,
                min: element.parse_attribute("min")?,
                max: element.parse_attribute("max")?,
                nominal: element.parse_attribute("nominal")?,
                unbounded: element.bool_attribute("unbounded")?,
                quantity: element.attribute("quantity").map(str::to_string),
                unit: element.attribute("unit").map(str::to_string),
                display_unit: element.attribute("displayUnit").map(str::to_string),
                relative_quantity: element.bool_attribute("relativeQuantity")?,
                derivative: element.parse_attribute("derivative")?,
                reinit: element.bool_attribute("reinit")?.unwrap_or(false),
            }),
            "String" => Self::String(StringAttributes {
                start: element.attribute("start").map(str::to_string),
            }),
            "Boolean" => Self::Boolean(BooleanAttributes {
                start: element.bool_attribute("start")?,
            }),
            other => {
                return Err(MetadataError::UnexpectedElement {
                    expected: "Integer, Real, String or Boolean",
                    found: other.to_string(),
                });
            }
        };
        Ok(attributes)
    }
}

/// One model variable, read-only after construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Variable {
    /// Full, unique name of the variable.
    pub name: String,

    /// Native handle of the value slot; alias variables share one.
    pub value_reference: ValueReference,

    pub description: Option<String>,

    /// Name of a type definition this variable's defaults come from.
    pub declared_type: Option<String>,

    pub causality: Option<Causality>,
    pub variability: Option<Variability>,
    pub initial: Option<Initial>,

    pub attributes: TypedAttributes,
}

impl Variable {
    /// Builds a variable from a `ScalarVariable` element.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if `name` or `valueReference` is missing,
    /// if an attribute cannot be parsed, or if the element does not contain
    /// exactly one of the `Integer`, `Real`, `String`, `Boolean` children.
    pub fn from_element(element: &Element) -> Result<Self, MetadataError> {
        element.expect_name("ScalarVariable")?;

        let name = element.required_attribute("name")?.to_string();
        let value_reference = element.parse_required("valueReference")?;

        let mut payloads = element
            .children
            .iter()
            .filter(|child| VariableType::from_element_name(&child.name).is_some());

        let payload = match (payloads.next(), payloads.next()) {
            (Some(payload), None) => payload,
            (None, _) => return Err(MetadataError::MissingTypePayload { variable: name }),
            (Some(first), Some(second)) => {
                let found = [first, second]
                    .into_iter()
                    .chain(payloads)
                    .map(|child| child.name.clone())
                    .collect();
                return Err(MetadataError::MultipleTypePayloads {
                    variable: name,
                    found,
                });
            }
        };

        Ok(Self {
            value_reference,
            description: element.attribute("description").map(str::to_string),
            declared_type: payload
                .attribute("declaredType")
                .or_else(|| element.attribute("declaredType"))
                .map(str::to_string),
            causality: element.parse_attribute("causality")?,
            variability: element.parse_attribute("variability")?,
            initial: element.parse_attribute("initial")?,
            attributes: TypedAttributes::from_element(payload)?,
            name,
        })
    }

    pub fn variable_type(&self) -> VariableType {
        self.attributes.variable_type()
    }

    /// Views the variable as an `Integer`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch`] if the variable has another type.
    pub fn as_integer(&self) -> Result<&IntegerAttributes, TypeMismatch> {
        match &self.attributes {
            TypedAttributes::Integer(attributes) => Ok(attributes),
            _ => Err(self.mismatch(VariableType::Integer)),
        }
    }

    /// Views the variable as a `Real`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch`] if the variable has another type.
    pub fn as_real(&self) -> Result<&RealAttributes, TypeMismatch> {
        match &self.attributes {
            TypedAttributes::Real(attributes) => Ok(attributes),
            _ => Err(self.mismatch(VariableType::Real)),
        }
    }

    /// Views the variable as a `String`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch`] if the variable has another type.
    pub fn as_string(&self) -> Result<&StringAttributes, TypeMismatch> {
        match &self.attributes {
            TypedAttributes::String(attributes) => Ok(attributes),
            _ => Err(self.mismatch(VariableType::String)),
        }
    }

    /// Views the variable as a `Boolean`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch`] if the variable has another type.
    pub fn as_boolean(&self) -> Result<&BooleanAttributes, TypeMismatch> {
        match &self.attributes {
            TypedAttributes::Boolean(attributes) => Ok(attributes),
            _ => Err(self.mismatch(VariableType::Boolean)),
        }
    }

    /// Builds the error for viewing this variable as `expected`.
    pub fn mismatch(&self, expected: VariableType) -> TypeMismatch {
        TypeMismatch {
            variable: self.name.clone(),
            expected,
            actual: self.variable_type(),
        }
    }
}
