/// A system of first-order ODEs, `dy/dt = f(t, y)`.
pub trait Equations {
    /// Number of state variables.
    fn dimension(&self) -> usize;

    /// Writes `f(time, y)` into `y_dot`.
    ///
    /// Both slices have length [`dimension`](Equations::dimension).
    fn compute_derivatives(&self, time: f64, y: &[f64], y_dot: &mut [f64]);
}

/// An integrator that advances a state vector across a time window.
///
/// The caller sizes the solver once with [`setup`](Solver::setup) and then
/// calls [`integrate`](Solver::integrate) with a state slice of that length.
pub trait Solver {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prepares internal buffers for states of `dimension` entries.
    fn setup(&mut self, dimension: usize);

    /// Advances `y` from `t0` toward `t1` in place.
    ///
    /// Returns the time actually reached, which is `t1` unless the solver
    /// stopped early.
    ///
    /// # Errors
    ///
    /// Returns an error if `y` does not match the set-up dimension or the
    /// underlying method fails.
    fn integrate(
        &mut self,
        equations: &dyn Equations,
        t0: f64,
        y: &mut [f64],
        t1: f64,
    ) -> Result<f64, Self::Error>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    type Error = S::Error;

    fn setup(&mut self, dimension: usize) {
        (**self).setup(dimension);
    }

    fn integrate(
        &mut self,
        equations: &dyn Equations,
        t0: f64,
        y: &mut [f64],
        t1: f64,
    ) -> Result<f64, Self::Error> {
        (**self).integrate(equations, t0, y, t1)
    }
}
