use std::collections::HashSet;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::ValueReference;

use super::{Causality, Element, MetadataError, Unknown, Variable};

/// Capability flags of the Model-Exchange interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct ModelExchangeCapabilities {
    pub model_identifier: String,
    pub needs_execution_tool: bool,

    /// The host may skip `completed_integrator_step` after accepted steps.
    pub completed_integrator_step_not_needed: bool,

    pub can_be_instantiated_only_once_per_process: bool,
    pub can_not_use_memory_management_functions: bool,
    pub can_get_and_set_fmu_state: bool,
    pub can_serialize_fmu_state: bool,
    pub provides_directional_derivative: bool,
}

/// Capability flags of the Co-Simulation interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct CoSimulationCapabilities {
    pub model_identifier: String,
    pub needs_execution_tool: bool,
    pub can_handle_variable_communication_step_size: bool,
    pub can_interpolate_inputs: bool,
    pub max_output_derivative_order: u32,
    pub can_run_asynchronuously: bool,
    pub can_be_instantiated_only_once_per_process: bool,
    pub can_not_use_memory_management_functions: bool,
    pub can_get_and_set_fmu_state: bool,
    pub can_serialize_fmu_state: bool,
    pub provides_directional_derivative: bool,
}

/// Experiment settings suggested by the model author.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct DefaultExperiment {
    pub start_time: Option<f64>,
    pub stop_time: Option<f64>,
    pub tolerance: Option<f64>,
    pub step_size: Option<f64>,
}

/// Dependency structure of outputs, state derivatives and initial unknowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct ModelStructure {
    pub outputs: Vec<Unknown>,

    /// One entry per continuous state, in state-vector order.
    pub derivatives: Vec<Unknown>,

    pub initial_unknowns: Vec<Unknown>,
}

/// Immutable metadata of a loaded model, shared by all of its instances.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct ModelDescription {
    pub fmi_version: String,
    pub model_name: String,
    pub guid: String,
    pub description: Option<String>,
    pub generation_tool: Option<String>,
    pub number_of_event_indicators: usize,
    pub model_exchange: Option<ModelExchangeCapabilities>,
    pub co_simulation: Option<CoSimulationCapabilities>,
    pub default_experiment: Option<DefaultExperiment>,

    /// Variables in declaration order; `variable_at(1)` is the first.
    pub variables: Vec<Variable>,

    pub model_structure: ModelStructure,
}

impl ModelDescription {
    /// Builds the metadata from a parsed `fmiModelDescription` element.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if a required attribute is missing or
    /// malformed, if a variable name is declared twice, or if the model
    /// structure refers to a variable index that does not exist.
    pub fn from_element(element: &Element) -> Result<Self, MetadataError> {
        element.expect_name("fmiModelDescription")?;

        let variables = element
            .child("ModelVariables")
            .map(|list| {
                list.children_named("ScalarVariable")
                    .map(Variable::from_element)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        {
            let mut names = HashSet::with_capacity(variables.len());
            if let Some(duplicate) = variables.iter().find(|v| !names.insert(v.name.as_str())) {
                return Err(MetadataError::DuplicateVariable {
                    name: duplicate.name.clone(),
                });
            }
        }

        let model_structure = element
            .child("ModelStructure")
            .map(model_structure)
            .transpose()?
            .unwrap_or_default();

        let description = Self {
            fmi_version: element.required_attribute("fmiVersion")?.to_string(),
            model_name: element.required_attribute("modelName")?.to_string(),
            guid: element.required_attribute("guid")?.to_string(),
            description: element.attribute("description").map(str::to_string),
            generation_tool: element.attribute("generationTool").map(str::to_string),
            number_of_event_indicators: element
                .parse_attribute("numberOfEventIndicators")?
                .unwrap_or(0),
            model_exchange: element
                .child("ModelExchange")
                .map(model_exchange)
                .transpose()?,
            co_simulation: element
                .child("CoSimulation")
                .map(co_simulation)
                .transpose()?,
            default_experiment: element
                .child("DefaultExperiment")
                .map(default_experiment)
                .transpose()?,
            variables,
            model_structure,
        };

        let structure = &description.model_structure;
        for unknown in structure
            .outputs
            .iter()
            .chain(&structure.derivatives)
            .chain(&structure.initial_unknowns)
        {
            description.variable_at(unknown.index)?;
            for &index in unknown.dependencies.indices().unwrap_or_default() {
                description.variable_at(index)?;
            }
        }

        Ok(description)
    }

    /// Number of continuous states, one per listed derivative.
    pub fn number_of_continuous_states(&self) -> usize {
        self.model_structure.derivatives.len()
    }

    pub fn supports_model_exchange(&self) -> bool {
        self.model_exchange.is_some()
    }

    pub fn supports_co_simulation(&self) -> bool {
        self.co_simulation.is_some()
    }

    pub fn completed_integrator_step_not_needed(&self) -> bool {
        self.model_exchange
            .as_ref()
            .is_some_and(|me| me.completed_integrator_step_not_needed)
    }

    /// Finds a variable by its unique name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|variable| variable.name == name)
    }

    /// Returns the variable at a 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::IndexOutOfRange`] for `0` or an index past
    /// the last variable.
    pub fn variable_at(&self, index: usize) -> Result<&Variable, MetadataError> {
        index
            .checked_sub(1)
            .and_then(|i| self.variables.get(i))
            .ok_or(MetadataError::IndexOutOfRange {
                index,
                len: self.variables.len(),
            })
    }

    /// Iterates over every variable bound to `value_reference`, aliases included.
    pub fn variables_by_value_reference(
        &self,
        value_reference: ValueReference,
    ) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(move |variable| variable.value_reference == value_reference)
    }

    pub fn variables_with_causality(&self, causality: Causality) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(move |variable| variable.causality == Some(causality))
    }
}

fn model_structure(element: &Element) -> Result<ModelStructure, MetadataError> {
    let unknowns = |list: &str| -> Result<Vec<Unknown>, MetadataError> {
        element.child(list).map_or_else(
            || Ok(Vec::new()),
            |list| list.children_named("Unknown").map(Unknown::from_element).collect(),
        )
    };

    Ok(ModelStructure {
        outputs: unknowns("Outputs")?,
        derivatives: unknowns("Derivatives")?,
        initial_unknowns: unknowns("InitialUnknowns")?,
    })
}

fn flag(element: &Element, key: &'static str) -> Result<bool, MetadataError> {
    Ok(element.bool_attribute(key)?.unwrap_or(false))
}

fn model_exchange(element: &Element) -> Result<ModelExchangeCapabilities, MetadataError> {
    Ok(ModelExchangeCapabilities {
        model_identifier: element.required_attribute("modelIdentifier")?.to_string(),
        needs_execution_tool: flag(element, "needsExecutionTool")?,
        completed_integrator_step_not_needed: flag(element, "completedIntegratorStepNotNeeded")?,
        can_be_instantiated_only_once_per_process: flag(
            element,
            "canBeInstantiatedOnlyOncePerProcess",
        )?,
        can_not_use_memory_management_functions: flag(
            element,
            "canNotUseMemoryManagementFunctions",
        )?,
        can_get_and_set_fmu_state: flag(element, "canGetAndSetFMUstate")?,
        can_serialize_fmu_state: flag(element, "canSerializeFMUstate")?,
        provides_directional_derivative: flag(element, "providesDirectionalDerivative")?,
    })
}

fn co_simulation(element: &Element) -> Result<CoSimulationCapabilities, MetadataError> {
    Ok(CoSimulationCapabilities {
        model_identifier: element.required_attribute("modelIdentifier")?.to_string(),
        needs_execution_tool: flag(element, "needsExecutionTool")?,
        can_handle_variable_communication_step_size: flag(
            element,
            "canHandleVariableCommunicationStepSize",
        )?,
        can_interpolate_inputs: flag(element, "canInterpolateInputs")?,
        max_output_derivative_order: element
            .parse_attribute("maxOutputDerivativeOrder")?
            .unwrap_or(0),
        can_run_asynchronuously: flag(element, "canRunAsynchronuously")?,
        can_be_instantiated_only_once_per_process: flag(
            element,
            "canBeInstantiatedOnlyOncePerProcess",
        )?,
        can_not_use_memory_management_functions: flag(
            element,
            "canNotUseMemoryManagementFunctions",
        )?,
        can_get_and_set_fmu_state: flag(element, "canGetAndSetFMUstate")?,
        can_serialize_fmu_state: flag(element, "canSerializeFMUstate")?,
        provides_directional_derivative: flag(element, "providesDirectionalDerivative")?,
    })
}

fn default_experiment(element: &Element) -> Result<DefaultExperiment, MetadataError> {
    Ok(DefaultExperiment {
        start_time: element.parse_attribute("startTime")?,
        stop_time: element.parse_attribute("stopTime")?,
        tolerance: element.parse_attribute("tolerance")?,
        step_size: element.parse_attribute("stepSize")?,
    })
}
