use fmi_core::model::ModelDescription;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time span, output interval and tolerance of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Experiment {
    pub start_time: f64,
    pub stop_time: f64,

    /// Interval between successive `do_step` calls.
    pub step_size: f64,

    /// Relative tolerance passed to the model at setup, if any.
    pub tolerance: Option<f64>,
}

/// Errors that can occur when validating an [`Experiment`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentError {
    #[error("start_time must be finite")]
    StartTime,

    #[error("stop_time must be finite and not before start_time")]
    StopTime,

    #[error("step_size must be finite and positive")]
    StepSize,

    #[error("tolerance must be finite and positive")]
    Tolerance,
}

impl Default for Experiment {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            stop_time: 1.0,
            step_size: 1.0 / 500.0,
            tolerance: None,
        }
    }
}

impl Experiment {
    /// Builds an experiment from the model's suggested defaults.
    ///
    /// Missing values fall back to a start of `0`, a stop of `1` and a step
    /// size of `(stop - start) / 500`. An empty or reversed span keeps the
    /// default step size.
    pub fn from_description(description: &ModelDescription) -> Self {
        let suggested = description.default_experiment.unwrap_or_default();

        let start_time = suggested.start_time.unwrap_or(0.0);
        let stop_time = suggested.stop_time.unwrap_or(1.0);
        let span = stop_time - start_time;
        let step_size = suggested.step_size.unwrap_or(if span > 0.0 {
            span / 500.0
        } else {
            Self::default().step_size
        });

        Self {
            start_time,
            stop_time,
            step_size,
            tolerance: suggested.tolerance,
        }
    }

    /// Checks that the experiment describes a runnable time span.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<(), ExperimentError> {
        if !self.start_time.is_finite() {
            return Err(ExperimentError::StartTime);
        }
        if !self.stop_time.is_finite() || self.stop_time < self.start_time {
            return Err(ExperimentError::StopTime);
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(ExperimentError::StepSize);
        }
        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(ExperimentError::Tolerance);
            }
        }
        Ok(())
    }
}
