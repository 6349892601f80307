/// Event emitted by [`simulate`](super::simulate).
///
/// Step 0 is emitted right after initialization. Steps 1..N follow each
/// successful `do_step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The step number (0 after initialization).
    pub step: usize,

    /// Simulation time after the step.
    pub time: f64,
}
