use thiserror::Error;

use super::VariableType;

/// Errors raised while building the model description from its element tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetadataError {
    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("<{element}> attribute `{attribute}` has invalid value {value:?}: {reason}")]
    InvalidAttribute {
        element: String,
        attribute: &'static str,
        value: String,
        reason: String,
    },

    #[error("variable `{variable}` declares no type (expected Integer, Real, String or Boolean)")]
    MissingTypePayload { variable: String },

    #[error("variable `{variable}` declares more than one type: {found:?}")]
    MultipleTypePayloads { variable: String, found: Vec<String> },

    #[error("expected <{expected}>, found <{found}>")]
    UnexpectedElement {
        expected: &'static str,
        found: String,
    },

    #[error("variable index {index} is out of range for {len} model variables")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("variable name `{name}` is declared more than once")]
    DuplicateVariable { name: String },
}

/// A variable was viewed as a type it does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("variable `{variable}` is {actual}, not {expected}")]
pub struct TypeMismatch {
    pub variable: String,
    pub expected: VariableType,
    pub actual: VariableType,
}
