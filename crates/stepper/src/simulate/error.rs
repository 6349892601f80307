use crate::{ExperimentError, StepperError};

/// Errors that can occur while driving a simulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid experiment: {0}")]
    Experiment(#[from] ExperimentError),

    #[error(transparent)]
    Stepper(#[from] StepperError),
}
