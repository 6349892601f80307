use std::sync::Arc;

use fmi_core::{
    EventInfo, ModelExchange, Status,
    model::{ModelDescription, Variable, VariableType},
};
use fmi_solvers::{Equations, Solver};
use tracing::{debug, trace};

use crate::{
    StepperError, Value,
    events::{EPS, state_event_detected},
};

/// Where the stepper is in the Model-Exchange lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    EventMode,
    ContinuousTimeMode,
    Terminated,
}

/// Drives one Model-Exchange instance with a pluggable [`Solver`].
///
/// The stepper owns the instance, the solver and every numeric buffer it
/// needs. Its own buffers are sized from the model description at
/// construction and never reallocated; whether a step allocates beyond that
/// is up to the solver.
///
/// All calls block on the native model. Nothing here times out; a model that
/// hangs will hang the caller.
pub struct Stepper<M, S> {
    instance: M,
    description: Arc<ModelDescription>,
    solver: S,
    tolerance: Option<f64>,
    phase: Phase,
    event_info: EventInfo,
    current_time: f64,
    x: Box<[f64]>,
    nominal_states: Box<[f64]>,
    dx: Box<[f64]>,
    z: Box<[f64]>,
    previous_z: Box<[f64]>,
}

/// Replays the derivatives fetched just before integration.
///
/// `time` and `y` are ignored. This is only exact for solvers that evaluate
/// derivatives once, at the start of the window; a solver sampling
/// intermediate points sees the start-of-window derivatives there too.
struct CachedDerivatives<'a> {
    dx: &'a [f64],
}

impl Equations for CachedDerivatives<'_> {
    fn dimension(&self) -> usize {
        self.dx.len()
    }

    fn compute_derivatives(&self, _time: f64, _y: &[f64], y_dot: &mut [f64]) {
        y_dot.copy_from_slice(self.dx);
    }
}

impl<M, S> Stepper<M, S>
where
    M: ModelExchange,
    S: Solver,
{
    /// Binds an instance and a solver to the model description they share.
    pub fn new(instance: M, description: Arc<ModelDescription>, mut solver: S) -> Self {
        let states = description.number_of_continuous_states();
        let indicators = description.number_of_event_indicators;
        solver.setup(states);

        Self {
            instance,
            description,
            solver,
            tolerance: None,
            phase: Phase::Uninitialized,
            event_info: EventInfo::default(),
            current_time: 0.0,
            x: vec![0.0; states].into_boxed_slice(),
            nominal_states: vec![1.0; states].into_boxed_slice(),
            dx: vec![0.0; states].into_boxed_slice(),
            z: vec![0.0; indicators].into_boxed_slice(),
            previous_z: vec![0.0; indicators].into_boxed_slice(),
        }
    }

    /// Sets the relative tolerance declared to the model at initialization.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.set_tolerance(Some(tolerance));
        self
    }

    /// Has no effect once the stepper is initialized.
    pub fn set_tolerance(&mut self, tolerance: Option<f64>) {
        self.tolerance = tolerance;
    }

    /// Initializes at `t = 0` with no stop time.
    ///
    /// # Errors
    ///
    /// See [`init_until`](Self::init_until).
    pub fn init(&mut self) -> Result<(), StepperError> {
        self.init_at(0.0)
    }

    /// Initializes at `start` with no stop time.
    ///
    /// # Errors
    ///
    /// See [`init_until`](Self::init_until).
    pub fn init_at(&mut self, start: f64) -> Result<(), StepperError> {
        self.init_until(start, 0.0)
    }

    /// Initializes the model and runs the initial event iteration.
    ///
    /// The stop time is declared to the model only if `stop > start`.
    /// Calling this on an initialized stepper does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StepperError::TerminatedDuringInit`] if the model asks to
    /// terminate during the initial event iteration.
    pub fn init_until(&mut self, start: f64, stop: f64) -> Result<(), StepperError> {
        if self.is_initialized() {
            return Ok(());
        }

        let stop_time = (stop > start).then_some(stop);
        self.instance
            .setup_experiment(self.tolerance, start, stop_time)
            .warn_if_not_ok("fmi2SetupExperiment");
        self.instance
            .enter_initialization_mode()
            .warn_if_not_ok("fmi2EnterInitializationMode");
        self.instance
            .exit_initialization_mode()
            .warn_if_not_ok("fmi2ExitInitializationMode");

        self.phase = Phase::EventMode;
        self.current_time = start;
        debug!(start, stop = ?stop_time, "initialized model");

        if self.event_iteration() {
            return Err(StepperError::TerminatedDuringInit);
        }

        self.fetch_nominals();
        Ok(())
    }

    /// Advances the simulation by `step_size`.
    ///
    /// Time events and state events inside the window are handled before
    /// the step returns. On success `current_time` has advanced by exactly
    /// `step_size`.
    ///
    /// Returns `Ok(false)` if the model requested termination, or if the
    /// stepper was already terminated.
    ///
    /// # Errors
    ///
    /// Returns [`StepperError::InvalidStepSize`] for a step size that is not
    /// positive, leaving the stepper untouched. Also fails if the stepper was
    /// never initialized or the solver fails or stalls.
    pub fn do_step(&mut self, step_size: f64) -> Result<bool, StepperError> {
        if step_size.is_nan() || step_size <= 0.0 {
            return Err(StepperError::InvalidStepSize { step_size });
        }
        match self.phase {
            Phase::Uninitialized => return Err(StepperError::NotInitialized),
            Phase::Terminated => return Ok(false),
            Phase::EventMode | Phase::ContinuousTimeMode => {}
        }

        let mut time = self.current_time;
        let stop_time = time + step_size;

        while time < stop_time {
            let mut t_next = (time + step_size).min(stop_time);

            let time_event_pending = match self.event_info.next_event_time() {
                Some(event_time) if time < event_time && event_time <= t_next => {
                    t_next = event_time;
                    true
                }
                _ => false,
            };

            let mut state_event = false;
            if t_next - time > EPS {
                let (detected, reached) = self.solve(time, t_next)?;
                state_event = detected;
                time = reached;
            } else {
                trace!(time, t_next, "skipping degenerate window");
                time = t_next;
                self.instance.set_time(time).warn_if_not_ok("fmi2SetTime");
            }
            let time_event = time_event_pending && time >= t_next;

            let mut step_event = false;
            if !self.description.completed_integrator_step_not_needed() {
                let completed = self.instance.completed_integrator_step();
                completed
                    .status
                    .warn_if_not_ok("fmi2CompletedIntegratorStep");
                if completed.terminate_simulation {
                    debug!(time, "model requested termination after integrator step");
                    self.current_time = time;
                    self.terminate();
                    return Ok(false);
                }
                step_event = completed.enter_event_mode;
            }

            if time_event || state_event || step_event {
                debug!(time, time_event, state_event, step_event, "handling event");
                self.instance
                    .enter_event_mode()
                    .warn_if_not_ok("fmi2EnterEventMode");
                self.phase = Phase::EventMode;

                if self.event_iteration() {
                    self.current_time = time;
                    return Ok(false);
                }

                if self.event_info.nominals_of_continuous_states_changed {
                    self.fetch_nominals();
                }
            }
        }

        self.current_time = time;
        Ok(true)
    }

    /// Terminates the instance.
    ///
    /// Only the first call reaches the model; later calls return `true`
    /// without doing anything. Returns `false` if the model reported an
    /// error while terminating.
    pub fn terminate(&mut self) -> bool {
        if self.phase == Phase::Terminated {
            debug!("instance already terminated");
            return true;
        }

        let status = self.instance.terminate().warn_if_not_ok("fmi2Terminate");
        self.phase = Phase::Terminated;
        debug!(time = self.current_time, %status, "terminated instance");

        !status.is_failure()
    }

    /// Reads the current value of a variable.
    ///
    /// # Errors
    ///
    /// Returns [`StepperError::UnknownVariable`] if the model has no
    /// variable called `name`.
    pub fn read(&mut self, name: &str) -> Result<Value, StepperError> {
        let variable = lookup(&self.description, name)?;
        let vr = [variable.value_reference];

        let value = match variable.variable_type() {
            VariableType::Real => {
                let mut value = [0.0];
                self.instance
                    .get_real(&vr, &mut value)
                    .warn_if_not_ok("fmi2GetReal");
                Value::Real(value[0])
            }
            VariableType::Integer => {
                let mut value = [0];
                self.instance
                    .get_integer(&vr, &mut value)
                    .warn_if_not_ok("fmi2GetInteger");
                Value::Integer(value[0])
            }
            VariableType::Boolean => {
                let mut value = [false];
                self.instance
                    .get_boolean(&vr, &mut value)
                    .warn_if_not_ok("fmi2GetBoolean");
                Value::Boolean(value[0])
            }
            VariableType::String => {
                let mut value = [String::new()];
                self.instance
                    .get_string(&vr, &mut value)
                    .warn_if_not_ok("fmi2GetString");
                let [value] = value;
                Value::String(value)
            }
        };

        Ok(value)
    }

    /// Writes a value to a variable.
    ///
    /// # Errors
    ///
    /// Returns [`StepperError::UnknownVariable`] for an unknown name and
    /// [`StepperError::TypeMismatch`] if `value` does not match the
    /// variable's type.
    pub fn write(&mut self, name: &str, value: impl Into<Value>) -> Result<Status, StepperError> {
        let variable = lookup(&self.description, name)?;
        let vr = [variable.value_reference];

        let status = match value.into() {
            Value::Real(value) if variable.as_real().is_ok() => self
                .instance
                .set_real(&vr, &[value])
                .warn_if_not_ok("fmi2SetReal"),
            Value::Integer(value) if variable.as_integer().is_ok() => self
                .instance
                .set_integer(&vr, &[value])
                .warn_if_not_ok("fmi2SetInteger"),
            Value::Boolean(value) if variable.as_boolean().is_ok() => self
                .instance
                .set_boolean(&vr, &[value])
                .warn_if_not_ok("fmi2SetBoolean"),
            Value::String(value) if variable.as_string().is_ok() => self
                .instance
                .set_string(&vr, &[value.as_str()])
                .warn_if_not_ok("fmi2SetString"),
            other => return Err(variable.mismatch(other.variable_type()).into()),
        };

        Ok(status)
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_initialized(&self) -> bool {
        self.phase != Phase::Uninitialized
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn model_description(&self) -> &ModelDescription {
        &self.description
    }

    pub fn instance(&self) -> &M {
        &self.instance
    }

    /// Gives direct access to the instance, bypassing the stepper's bookkeeping.
    pub fn instance_mut(&mut self) -> &mut M {
        &mut self.instance
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Continuous states as of the last integrated window.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Event indicators as of the last sample.
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn nominal_states(&self) -> &[f64] {
        &self.nominal_states
    }

    /// Runs event iterations until the model settles.
    ///
    /// Returns `true` if the model asked to terminate, in which case the
    /// instance has been terminated.
    fn event_iteration(&mut self) -> bool {
        self.event_info.reset_for_iteration();

        while self.event_info.new_discrete_states_needed {
            self.instance
                .new_discrete_states(&mut self.event_info)
                .warn_if_not_ok("fmi2NewDiscreteStates");

            if self.event_info.terminate_simulation {
                debug!(
                    time = self.current_time,
                    "model requested termination during event iteration"
                );
                self.terminate();
                return true;
            }
        }

        self.instance
            .enter_continuous_time_mode()
            .warn_if_not_ok("fmi2EnterContinuousTimeMode");
        self.phase = Phase::ContinuousTimeMode;

        self.instance
            .get_event_indicators(&mut self.z)
            .warn_if_not_ok("fmi2GetEventIndicators");

        false
    }

    /// Integrates from `t` toward `t_next` and samples the event indicators.
    ///
    /// The reached time and the new states are pushed to the model before the
    /// indicators are read. Returns whether an indicator changed sign and the
    /// time reached.
    fn solve(&mut self, t: f64, t_next: f64) -> Result<(bool, f64), StepperError> {
        self.instance
            .get_continuous_states(&mut self.x)
            .warn_if_not_ok("fmi2GetContinuousStates");
        self.instance
            .get_derivatives(&mut self.dx)
            .warn_if_not_ok("fmi2GetDerivatives");

        let equations = CachedDerivatives { dx: &self.dx };
        let reached = self
            .solver
            .integrate(&equations, t, &mut self.x, t_next)
            .map_err(StepperError::integration)?;
        if reached.is_nan() || reached <= t {
            return Err(StepperError::IntegratorStalled { time: t });
        }

        self.instance.set_time(reached).warn_if_not_ok("fmi2SetTime");
        self.instance
            .set_continuous_states(&self.x)
            .warn_if_not_ok("fmi2SetContinuousStates");

        self.previous_z.copy_from_slice(&self.z);
        self.instance
            .get_event_indicators(&mut self.z)
            .warn_if_not_ok("fmi2GetEventIndicators");

        Ok((state_event_detected(&self.previous_z, &self.z), reached))
    }

    fn fetch_nominals(&mut self) {
        if self.nominal_states.is_empty() {
            return;
        }
        self.instance
            .get_nominals_of_continuous_states(&mut self.nominal_states)
            .warn_if_not_ok("fmi2GetNominalsOfContinuousStates");
    }
}

fn lookup<'a>(description: &'a ModelDescription, name: &str) -> Result<&'a Variable, StepperError> {
    description
        .variable(name)
        .ok_or_else(|| StepperError::UnknownVariable {
            name: name.to_string(),
        })
}
