//! Model-Exchange stepping engine for FMI 2.0.
//!
//! A [`Stepper`] owns one native instance and one integrator. It runs the
//! initialization handshake, advances time window by window, detects state
//! and time events, and runs event iteration when they occur:
//!
//! ```ignore
//! use fmi_solvers::ForwardEuler;
//! use fmi_stepper::Stepper;
//!
//! let mut stepper = Stepper::new(instance, description, ForwardEuler::new());
//! stepper.init()?;
//! while stepper.current_time() < 1.0 {
//!     if !stepper.do_step(1e-3)? {
//!         break; // the model asked to stop
//!     }
//! }
//! stepper.terminate();
//! ```
//!
//! [`simulate`] wraps that loop around an [`Experiment`].

mod error;
pub mod events;
mod experiment;
pub mod simulate;
mod stepper;
mod value;

#[cfg(test)]
mod test_utils;

pub use error::StepperError;
pub use experiment::{Experiment, ExperimentError};
pub use stepper::{Phase, Stepper};
pub use value::Value;
