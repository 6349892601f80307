//! Fixed-interval driving loop.
//!
//! Initializes a [`Stepper`] from an [`Experiment`], calls `do_step` every
//! `step_size` until `stop_time`, then terminates the instance:
//!
//! ```ignore
//! use fmi_stepper::{Experiment, Stepper, simulate};
//!
//! let mut stepper = Stepper::new(instance, description, ForwardEuler::new());
//! let solution = simulate::simulate_unobserved(&mut stepper, &Experiment::default())?;
//! assert_eq!(solution.status, simulate::Status::Complete);
//! ```

mod action;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use fmi_core::{ModelExchange, Observer};
use fmi_solvers::Solver;
use tracing::{debug, warn};

use crate::{Experiment, Stepper, events::EPS};

/// Runs `experiment` on `stepper`.
///
/// # Algorithm
///
/// 1. Validate the experiment and initialize from `start_time` to `stop_time`.
/// 2. Emit step 0 to the observer.
/// 3. While `stop_time` is ahead, step by `step_size`, shortening the last
///    step so the run ends exactly on `stop_time`, and emit an [`Event`].
/// 4. Terminate the instance.
///
/// The run ends early if the model requests termination or the observer
/// returns [`Action::StopEarly`]. The instance is terminated in every case
/// once initialization has succeeded, including when a step fails.
///
/// # Errors
///
/// Returns an error if the experiment is invalid, if the model terminates
/// during initialization, or if a step fails.
pub fn simulate<M, S, Obs>(
    stepper: &mut Stepper<M, S>,
    experiment: &Experiment,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    M: ModelExchange,
    S: Solver,
    Obs: Observer<Event, Action>,
{
    experiment.validate()?;

    if experiment.tolerance.is_some() {
        stepper.set_tolerance(experiment.tolerance);
    }
    stepper.init_until(experiment.start_time, experiment.stop_time)?;

    let mut steps = 0;
    let mut status = Status::Complete;

    let event = Event {
        step: 0,
        time: stepper.current_time(),
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        status = Status::StoppedByObserver;
    }

    while status == Status::Complete && experiment.stop_time - stepper.current_time() > EPS {
        let step_size = experiment
            .step_size
            .min(experiment.stop_time - stepper.current_time());

        let advanced = match stepper.do_step(step_size) {
            Ok(advanced) => advanced,
            Err(err) => {
                stepper.terminate();
                return Err(err.into());
            }
        };
        if !advanced {
            status = Status::TerminatedByModel;
            break;
        }
        steps += 1;

        let event = Event {
            step: steps,
            time: stepper.current_time(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            status = Status::StoppedByObserver;
        }
    }

    if !stepper.terminate() {
        warn!(time = stepper.current_time(), "instance reported a failure while terminating");
    }
    debug!(?status, steps, time = stepper.current_time(), "simulation finished");

    Ok(Solution {
        status,
        steps,
        time: stepper.current_time(),
    })
}

/// Runs `experiment` on `stepper` without observation.
///
/// This is a convenience wrapper around [`simulate`] that discards events.
///
/// # Errors
///
/// Returns an error if the experiment is invalid, if the model terminates
/// during initialization, or if a step fails.
pub fn simulate_unobserved<M, S>(
    stepper: &mut Stepper<M, S>,
    experiment: &Experiment,
) -> Result<Solution, Error>
where
    M: ModelExchange,
    S: Solver,
{
    simulate(stepper, experiment, ())
}
