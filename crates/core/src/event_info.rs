use crate::Status;

/// Event flags exchanged with the model during event iteration.
///
/// The caller resets the record before each event-iteration round and the
/// model updates it on every call to
/// [`ModelExchange::new_discrete_states`](crate::ModelExchange::new_discrete_states).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventInfo {
    pub new_discrete_states_needed: bool,
    pub terminate_simulation: bool,
    pub nominals_of_continuous_states_changed: bool,
    pub values_of_continuous_states_changed: bool,
    pub next_event_time_defined: bool,
    pub next_event_time: f64,
}

impl EventInfo {
    /// Puts the record in the state required at the start of an event iteration.
    ///
    /// Sets `new_discrete_states_needed` and clears `terminate_simulation`.
    /// The remaining flags are owned by the model and left untouched.
    pub fn reset_for_iteration(&mut self) {
        self.new_discrete_states_needed = true;
        self.terminate_simulation = false;
    }

    /// Returns the time of the next time event, if the model defined one.
    #[must_use]
    pub fn next_event_time(&self) -> Option<f64> {
        self.next_event_time_defined.then_some(self.next_event_time)
    }
}

impl Default for EventInfo {
    fn default() -> Self {
        Self {
            new_discrete_states_needed: true,
            terminate_simulation: false,
            nominals_of_continuous_states_changed: false,
            values_of_continuous_states_changed: false,
            next_event_time_defined: false,
            next_event_time: 0.0,
        }
    }
}

/// Result of [`ModelExchange::completed_integrator_step`](crate::ModelExchange::completed_integrator_step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedIntegratorStep {
    pub status: Status,

    /// The model requests event mode before integration continues.
    pub enter_event_mode: bool,

    /// The model requests that the simulation ends.
    pub terminate_simulation: bool,
}

impl CompletedIntegratorStep {
    /// A step completion that requests nothing.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            enter_event_mode: false,
            terminate_simulation: false,
        }
    }
}
