use std::error::Error as StdError;

use fmi_core::model::TypeMismatch;
use thiserror::Error;

/// Errors returned by [`Stepper`](crate::Stepper).
///
/// A model that asks to terminate is not an error once the stepper is
/// running; [`Stepper::do_step`](crate::Stepper::do_step) reports it by
/// returning `false`.
#[derive(Debug, Error)]
pub enum StepperError {
    #[error("step size must be positive, got {step_size}")]
    InvalidStepSize { step_size: f64 },

    #[error("the model requested termination during initialization")]
    TerminatedDuringInit,

    #[error("the stepper has not been initialized")]
    NotInitialized,

    #[error("integration failed: {0}")]
    Integration(#[source] Box<dyn StdError + Send + Sync>),

    #[error("integrator made no progress from t = {time}")]
    IntegratorStalled { time: f64 },

    #[error("no variable named `{name}`")]
    UnknownVariable { name: String },

    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),
}

impl StepperError {
    pub(crate) fn integration<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Integration(Box::new(err))
    }
}
