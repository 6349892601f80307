/// Control actions an observer can return from [`simulate`](super::simulate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop stepping, terminate the instance and return the solution so far.
    StopEarly,
}
