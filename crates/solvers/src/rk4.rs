//! Classic fourth-order Runge-Kutta, delegated to [`ode_solvers::Rk4`].

use nalgebra::DVector;
use ode_solvers::System;

use crate::{Equations, Error, Solver, error::check_dimension};

/// Fixed-step RK4 that splits each window into equal sub-steps.
#[derive(Debug, Clone)]
pub struct Rk4 {
    /// Number of RK4 steps taken across one window.
    pub steps_per_window: usize,
    dimension: usize,
}

impl Rk4 {
    /// Creates a solver taking `steps_per_window` steps per window (at least one).
    pub fn new(steps_per_window: usize) -> Self {
        Self {
            steps_per_window: steps_per_window.max(1),
            dimension: 0,
        }
    }
}

impl Default for Rk4 {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Solver for Rk4 {
    type Error = Error;

    fn setup(&mut self, dimension: usize) {
        self.dimension = dimension;
    }

    fn integrate(
        &mut self,
        equations: &dyn Equations,
        t0: f64,
        y: &mut [f64],
        t1: f64,
    ) -> Result<f64, Error> {
        check_dimension(self.dimension, y.len())?;
        if t1 <= t0 {
            return Ok(t0);
        }
        if y.is_empty() {
            return Ok(t1);
        }

        let steps = self.steps_per_window.max(1);
        let step_size = sub_step(t1 - t0, steps);

        let system = EquationSystem { equations };
        let mut stepper =
            ode_solvers::Rk4::new(system, t0, DVector::from_column_slice(y), t1, step_size);
        stepper.integrate()?;

        if let Some(last) = stepper.y_out().last() {
            y.copy_from_slice(last.as_slice());
        }

        Ok(t1)
    }
}

/// Returns a step size that covers `window` in exactly `steps` steps.
///
/// `ode_solvers` takes `ceil(window / step_size)` steps, which rounding can
/// push one past `steps`.
fn sub_step(window: f64, steps: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let count = steps as f64;
    let mut step_size = window / count;
    while (window / step_size).ceil() > count {
        step_size = f64::from_bits(step_size.to_bits() + 1);
    }
    step_size
}

struct EquationSystem<'a> {
    equations: &'a dyn Equations,
}

impl System<f64, DVector<f64>> for EquationSystem<'_> {
    fn system(&self, x: f64, y: &DVector<f64>, dy: &mut DVector<f64>) {
        self.equations
            .compute_derivatives(x, y.as_slice(), dy.as_mut_slice());
    }
}
