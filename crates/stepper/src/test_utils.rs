//! A scripted native model that records the calls made into it.

use std::{collections::BTreeMap, sync::Arc};

use fmi_core::{
    CompletedIntegratorStep, EventInfo, Instance, ModelExchange, Status, ValueReference,
    model::{Element, ModelDescription},
};

/// Value reference of the `counter` Integer variable.
pub(crate) const COUNTER: ValueReference = 100;
/// Value reference of the `flag` Boolean variable.
pub(crate) const FLAG: ValueReference = 101;
/// Value reference of the `label` String variable.
pub(crate) const LABEL: ValueReference = 102;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SetupExperiment { start: f64, stop: Option<f64> },
    EnterInitializationMode,
    ExitInitializationMode,
    SetTime(f64),
    EnterEventMode,
    EnterContinuousTimeMode,
    NewDiscreteStates,
    CompletedIntegratorStep,
    GetNominals,
    Terminate,
}

/// A model with `x' = rates` and indicators computed from time and state.
#[derive(Debug)]
pub(crate) struct ScriptedModel {
    pub(crate) calls: Vec<Call>,
    pub(crate) time: f64,
    pub(crate) x: Vec<f64>,
    pub(crate) rates: Vec<f64>,
    pub(crate) indicators: fn(f64, &[f64], &mut [f64]),

    /// Times at which the model schedules time events.
    pub(crate) time_events: Vec<f64>,

    /// 1-based count of `new_discrete_states` calls at which to request termination.
    pub(crate) terminate_on_call: Option<usize>,

    /// Time from which `completed_integrator_step` requests termination.
    pub(crate) terminate_after: Option<f64>,

    /// Time from which `completed_integrator_step` requests event mode, once.
    pub(crate) step_event_at: Option<f64>,

    /// Discrete-state rounds each event iteration needs.
    pub(crate) rounds_per_event: usize,

    pub(crate) nominals: Vec<f64>,
    pub(crate) nominals_change: bool,

    /// Status returned by every call.
    pub(crate) status: Status,

    pub(crate) reals: BTreeMap<ValueReference, f64>,
    pub(crate) integers: BTreeMap<ValueReference, i32>,
    pub(crate) booleans: BTreeMap<ValueReference, bool>,
    pub(crate) strings: BTreeMap<ValueReference, String>,

    discrete_calls: usize,
    rounds_left: usize,
}

fn no_indicators(_time: f64, _x: &[f64], _z: &mut [f64]) {}

impl ScriptedModel {
    pub(crate) fn new(x0: &[f64], rates: &[f64]) -> Self {
        Self {
            calls: Vec::new(),
            time: 0.0,
            x: x0.to_vec(),
            rates: rates.to_vec(),
            indicators: no_indicators,
            time_events: Vec::new(),
            terminate_on_call: None,
            terminate_after: None,
            step_event_at: None,
            rounds_per_event: 1,
            nominals: vec![1.0; x0.len()],
            nominals_change: false,
            status: Status::Ok,
            reals: BTreeMap::new(),
            integers: BTreeMap::from([(COUNTER, 0)]),
            booleans: BTreeMap::from([(FLAG, false)]),
            strings: BTreeMap::from([(LABEL, String::new())]),
            discrete_calls: 0,
            rounds_left: 0,
        }
    }

    pub(crate) fn with_indicators(mut self, indicators: fn(f64, &[f64], &mut [f64])) -> Self {
        self.indicators = indicators;
        self
    }

    pub(crate) fn with_time_events(mut self, times: &[f64]) -> Self {
        self.time_events = times.to_vec();
        self
    }

    /// Times passed to `set_time`, in call order.
    pub(crate) fn set_times(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetTime(time) => Some(*time),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|call| *call == wanted).count()
    }

    /// Index of the first `set_time` call at `time`, compared exactly.
    pub(crate) fn position_of_set_time(&self, time: f64) -> Option<usize> {
        self.calls
            .iter()
            .position(|call| matches!(call, Call::SetTime(t) if *t == time))
    }

    fn state_count(&self) -> ValueReference {
        ValueReference::try_from(self.x.len()).unwrap_or(ValueReference::MAX)
    }
}

impl Instance for ScriptedModel {
    fn setup_experiment(&mut self, _tolerance: Option<f64>, start: f64, stop: Option<f64>) -> Status {
        self.calls.push(Call::SetupExperiment { start, stop });
        self.time = start;
        self.status
    }

    fn enter_initialization_mode(&mut self) -> Status {
        self.calls.push(Call::EnterInitializationMode);
        self.status
    }

    fn exit_initialization_mode(&mut self) -> Status {
        self.calls.push(Call::ExitInitializationMode);
        self.rounds_left = self.rounds_per_event;
        self.status
    }

    fn terminate(&mut self) -> Status {
        self.calls.push(Call::Terminate);
        self.status
    }

    fn get_real(&mut self, vrs: &[ValueReference], values: &mut [f64]) -> Status {
        let states = self.state_count();
        for (vr, value) in vrs.iter().zip(values) {
            *value = if *vr < states {
                self.x[*vr as usize]
            } else {
                self.reals.get(vr).copied().unwrap_or_default()
            };
        }
        self.status
    }

    fn get_integer(&mut self, vrs: &[ValueReference], values: &mut [i32]) -> Status {
        for (vr, value) in vrs.iter().zip(values) {
            *value = self.integers.get(vr).copied().unwrap_or_default();
        }
        self.status
    }

    fn get_boolean(&mut self, vrs: &[ValueReference], values: &mut [bool]) -> Status {
        for (vr, value) in vrs.iter().zip(values) {
            *value = self.booleans.get(vr).copied().unwrap_or_default();
        }
        self.status
    }

    fn get_string(&mut self, vrs: &[ValueReference], values: &mut [String]) -> Status {
        for (vr, value) in vrs.iter().zip(values) {
            *value = self.strings.get(vr).cloned().unwrap_or_default();
        }
        self.status
    }

    fn set_real(&mut self, vrs: &[ValueReference], values: &[f64]) -> Status {
        let states = self.state_count();
        for (vr, value) in vrs.iter().zip(values) {
            if *vr < states {
                self.x[*vr as usize] = *value;
            } else {
                self.reals.insert(*vr, *value);
            }
        }
        self.status
    }

    fn set_integer(&mut self, vrs: &[ValueReference], values: &[i32]) -> Status {
        for (vr, value) in vrs.iter().zip(values) {
            self.integers.insert(*vr, *value);
        }
        self.status
    }

    fn set_boolean(&mut self, vrs: &[ValueReference], values: &[bool]) -> Status {
        for (vr, value) in vrs.iter().zip(values) {
            self.booleans.insert(*vr, *value);
        }
        self.status
    }

    fn set_string(&mut self, vrs: &[ValueReference], values: &[&str]) -> Status {
        for (vr, value) in vrs.iter().zip(values) {
            self.strings.insert(*vr, (*value).to_string());
        }
        self.status
    }
}

impl ModelExchange for ScriptedModel {
    fn set_time(&mut self, time: f64) -> Status {
        self.calls.push(Call::SetTime(time));
        self.time = time;
        self.status
    }

    fn set_continuous_states(&mut self, x: &[f64]) -> Status {
        self.x.copy_from_slice(x);
        self.status
    }

    fn enter_event_mode(&mut self) -> Status {
        self.calls.push(Call::EnterEventMode);
        self.rounds_left = self.rounds_per_event;
        self.status
    }

    fn enter_continuous_time_mode(&mut self) -> Status {
        self.calls.push(Call::EnterContinuousTimeMode);
        self.status
    }

    fn new_discrete_states(&mut self, event_info: &mut EventInfo) -> Status {
        self.calls.push(Call::NewDiscreteStates);
        self.discrete_calls += 1;
        self.rounds_left = self.rounds_left.saturating_sub(1);

        event_info.new_discrete_states_needed = self.rounds_left > 0;
        event_info.terminate_simulation = self.terminate_on_call == Some(self.discrete_calls);
        event_info.nominals_of_continuous_states_changed = self.nominals_change;

        match self.time_events.iter().find(|&&t| t > self.time) {
            Some(&next) => {
                event_info.next_event_time_defined = true;
                event_info.next_event_time = next;
            }
            None => event_info.next_event_time_defined = false,
        }

        self.status
    }

    fn completed_integrator_step(&mut self) -> CompletedIntegratorStep {
        self.calls.push(Call::CompletedIntegratorStep);

        let enter_event_mode = match self.step_event_at {
            Some(at) if self.time >= at => {
                self.step_event_at = None;
                true
            }
            _ => false,
        };

        CompletedIntegratorStep {
            status: self.status,
            enter_event_mode,
            terminate_simulation: self.terminate_after.is_some_and(|at| self.time >= at),
        }
    }

    fn get_derivatives(&mut self, dx: &mut [f64]) -> Status {
        dx.copy_from_slice(&self.rates);
        self.status
    }

    fn get_event_indicators(&mut self, z: &mut [f64]) -> Status {
        (self.indicators)(self.time, &self.x, z);
        self.status
    }

    fn get_continuous_states(&mut self, x: &mut [f64]) -> Status {
        x.copy_from_slice(&self.x);
        self.status
    }

    fn get_nominals_of_continuous_states(&mut self, nominals: &mut [f64]) -> Status {
        self.calls.push(Call::GetNominals);
        nominals.copy_from_slice(&self.nominals);
        self.status
    }
}

/// Describes a model with `states` Real states `x1..xn` and their
/// derivatives, `indicators` event indicators, and one variable of each other
/// type (`counter`, `flag`, `label`).
pub(crate) fn description(
    states: usize,
    indicators: usize,
    completed_integrator_step_not_needed: bool,
) -> Arc<ModelDescription> {
    let real = |name: String, vr: usize| {
        Element::new("ScalarVariable")
            .with_attribute("name", name)
            .with_attribute("valueReference", vr.to_string())
            .with_attribute("causality", "local")
    };

    let mut variables = Element::new("ModelVariables");
    let mut derivatives = Element::new("Derivatives");
    for i in 0..states {
        variables = variables.with_child(
            real(format!("x{}", i + 1), i).with_child(Element::new("Real").with_attribute("start", "0")),
        );
    }
    for i in 0..states {
        variables = variables.with_child(
            real(format!("der(x{})", i + 1), 1000 + i)
                .with_child(Element::new("Real").with_attribute("derivative", (i + 1).to_string())),
        );
        derivatives = derivatives.with_child(
            Element::new("Unknown").with_attribute("index", (states + i + 1).to_string()),
        );
    }

    let other = |name: &str, vr: ValueReference, payload: &str| {
        Element::new("ScalarVariable")
            .with_attribute("name", name)
            .with_attribute("valueReference", vr.to_string())
            .with_attribute("causality", "parameter")
            .with_child(Element::new(payload))
    };
    variables = variables
        .with_child(other("counter", COUNTER, "Integer"))
        .with_child(other("flag", FLAG, "Boolean"))
        .with_child(other("label", LABEL, "String"));

    let root = Element::new("fmiModelDescription")
        .with_attribute("fmiVersion", "2.0")
        .with_attribute("modelName", "Scripted")
        .with_attribute("guid", "{scripted}")
        .with_attribute("numberOfEventIndicators", indicators.to_string())
        .with_child(
            Element::new("ModelExchange")
                .with_attribute("modelIdentifier", "scripted")
                .with_attribute(
                    "completedIntegratorStepNotNeeded",
                    completed_integrator_step_not_needed.to_string(),
                ),
        )
        .with_child(variables)
        .with_child(Element::new("ModelStructure").with_child(derivatives));

    Arc::new(ModelDescription::from_element(&root).expect("scripted description is valid"))
}

/// Routes log output through the test harness; honours `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
