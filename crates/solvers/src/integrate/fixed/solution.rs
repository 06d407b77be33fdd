use runge_core::Trajectory;

/// Indicates how the integrator terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the end of the grid.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a fixed-step integration.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the integrator terminated.
    pub status: Status,

    /// Grid times and solution values, including the initial condition.
    pub trajectory: Trajectory,

    /// Number of steps completed.
    pub steps: usize,

    /// Number of right-hand-side evaluations.
    pub evals: usize,
}
