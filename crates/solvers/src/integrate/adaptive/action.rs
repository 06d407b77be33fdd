/// Control actions supported by the adaptive integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the integration and return the trajectory so far.
    StopEarly,
}
