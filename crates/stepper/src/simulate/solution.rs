/// Indicates how the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the experiment's stop time.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,

    /// The model requested termination.
    TerminatedByModel,
}

/// The result of [`simulate`](super::simulate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// How the simulation ended.
    pub status: Status,

    /// Number of successful `do_step` calls.
    pub steps: usize,

    /// Simulation time when the run ended.
    pub time: f64,
}
