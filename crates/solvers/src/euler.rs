//! Forward Euler.
//!
//! Takes a single explicit step across the whole window:
//!
//! ```text
//! y(t1) = y(t0) + (t1 - t0) * f(t0, y(t0))
//! ```

use crate::{Equations, Error, Solver, error::check_dimension};

/// Single-step explicit Euler integrator.
#[derive(Debug, Clone, Default)]
pub struct ForwardEuler {
    y_dot: Vec<f64>,
}

impl ForwardEuler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Solver for ForwardEuler {
    type Error = Error;

    fn setup(&mut self, dimension: usize) {
        self.y_dot = vec![0.0; dimension];
    }

    fn integrate(
        &mut self,
        equations: &dyn Equations,
        t0: f64,
        y: &mut [f64],
        t1: f64,
    ) -> Result<f64, Error> {
        check_dimension(self.y_dot.len(), y.len())?;
        if y.is_empty() {
            return Ok(t1);
        }

        equations.compute_derivatives(t0, y, &mut self.y_dot);

        let dt = t1 - t0;
        for (value, rate) in y.iter_mut().zip(&self.y_dot) {
            *value += dt * rate;
        }

        Ok(t1)
    }
}
