use runge_core::Trajectory;

/// Indicates how the integrator terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the end of the time span.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of an adaptive integration.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the integrator terminated.
    pub status: Status,

    /// Accepted times and solution values, including the initial condition.
    pub trajectory: Trajectory,

    /// Number of accepted steps.
    pub accepted: usize,

    /// Number of rejected attempts.
    pub rejected: usize,

    /// Number of steps accepted only because they were at `min_dt`.
    pub forced: usize,

    /// Number of right-hand-side evaluations.
    pub evals: usize,
}
