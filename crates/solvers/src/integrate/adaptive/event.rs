/// Event emitted by the adaptive integrator after each step attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A step was accepted and appended to the trajectory.
    Accepted {
        /// Number of accepted steps so far, including this one.
        step: usize,

        /// Time reached by the step.
        t: f64,

        /// Size of the step attempted.
        dt: f64,

        /// Local error estimate of the step.
        error: f64,

        /// Size of the next step to attempt.
        next_dt: f64,

        /// Solution at `t`.
        u: Vec<f64>,
    },

    /// A step was rejected and will be retried from the same state.
    Rejected {
        /// Time the rejected step started from.
        t: f64,

        /// Size of the rejected step.
        dt: f64,

        /// Local error estimate that caused the rejection.
        error: f64,

        /// Size of the retry.
        next_dt: f64,
    },
}

impl Event {
    /// Returns true for an accepted step.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}
