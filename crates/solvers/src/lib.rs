//! Integrators for FMI Model Exchange.
//!
//! The stepping engine owns the state vector and asks a [`Solver`] to advance
//! it across one window at a time. Derivatives come from an [`Equations`]
//! implementation passed on every call.
//!
//! - [`ForwardEuler`]: one explicit Euler step per window
//! - [`Rk4`]: fixed-step classic Runge-Kutta on top of `ode_solvers`
//!   (requires the `ode-solvers` feature)

mod error;
mod euler;
#[cfg(feature = "ode-solvers")]
mod rk4;
mod solver;

pub use error::Error;
pub use euler::ForwardEuler;
#[cfg(feature = "ode-solvers")]
pub use rk4::Rk4;
pub use solver::{Equations, Solver};
