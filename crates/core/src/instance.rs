use crate::{CompletedIntegratorStep, EventInfo, Status};

/// Opaque handle identifying a variable's value slot in the native model.
///
/// Value references are not unique: alias variables share one.
pub type ValueReference = u32;

/// Lifecycle and value-access operations common to every FMI instance.
///
/// Implementations wrap one instantiated native model. Every operation blocks
/// until the native call returns; there is no timeout or cancellation, so a
/// model that hangs also hangs the caller.
///
/// Buffer-filling operations write into caller-owned slices whose lengths
/// match the value-reference slices; implementations must not allocate.
pub trait Instance {
    /// Declares the experiment before initialization.
    ///
    /// `stop_time` is `None` when no stop time is defined.
    fn setup_experiment(
        &mut self,
        tolerance: Option<f64>,
        start_time: f64,
        stop_time: Option<f64>,
    ) -> Status;

    fn enter_initialization_mode(&mut self) -> Status;

    fn exit_initialization_mode(&mut self) -> Status;

    fn terminate(&mut self) -> Status;

    fn get_real(&mut self, vrs: &[ValueReference], values: &mut [f64]) -> Status;

    fn get_integer(&mut self, vrs: &[ValueReference], values: &mut [i32]) -> Status;

    fn get_boolean(&mut self, vrs: &[ValueReference], values: &mut [bool]) -> Status;

    fn get_string(&mut self, vrs: &[ValueReference], values: &mut [String]) -> Status;

    fn set_real(&mut self, vrs: &[ValueReference], values: &[f64]) -> Status;

    fn set_integer(&mut self, vrs: &[ValueReference], values: &[i32]) -> Status;

    fn set_boolean(&mut self, vrs: &[ValueReference], values: &[bool]) -> Status;

    fn set_string(&mut self, vrs: &[ValueReference], values: &[&str]) -> Status;
}

/// The primitive operations of a Model Exchange instance.
///
/// The model only evaluates derivatives and event indicators; the caller owns
/// time integration and event detection. State and derivative slices have
/// length `number_of_continuous_states`, indicator slices have length
/// `number_of_event_indicators`.
pub trait ModelExchange: Instance {
    fn set_time(&mut self, time: f64) -> Status;

    fn set_continuous_states(&mut self, x: &[f64]) -> Status;

    fn enter_event_mode(&mut self) -> Status;

    fn enter_continuous_time_mode(&mut self) -> Status;

    /// Evaluates the discrete-state update and writes the outcome into `event_info`.
    fn new_discrete_states(&mut self, event_info: &mut EventInfo) -> Status;

    /// Notifies the model that an integrator step was accepted.
    fn completed_integrator_step(&mut self) -> CompletedIntegratorStep;

    fn get_derivatives(&mut self, dx: &mut [f64]) -> Status;

    fn get_event_indicators(&mut self, z: &mut [f64]) -> Status;

    fn get_continuous_states(&mut self, x: &mut [f64]) -> Status;

    fn get_nominals_of_continuous_states(&mut self, nominals: &mut [f64]) -> Status;
}
