//! The model description.
//!
//! A [`ModelDescription`] is built once from an already-parsed [`Element`]
//! tree and is read-only afterwards. It is shared by every instance of the
//! model it describes.

mod classification;
mod description;
mod element;
mod error;
mod unknown;
mod variable;

pub use classification::{Causality, Initial, UnknownVariant, Variability};
pub use description::{
    CoSimulationCapabilities, DefaultExperiment, ModelDescription, ModelExchangeCapabilities,
    ModelStructure,
};
pub use element::Element;
pub use error::{MetadataError, TypeMismatch};
pub use unknown::{Dependencies, DependenciesKind, Unknown};
pub use variable::{
    BooleanAttributes, IntegerAttributes, RealAttributes, StringAttributes, TypedAttributes,
    Variable, VariableType,
};
