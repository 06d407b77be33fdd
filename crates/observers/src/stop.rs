use runge_core::Observer;

use crate::traits::{CanStopEarly, HasTime};

/// An observer that stops an integration once it reaches a given time.
///
/// The step that first reaches `t_stop` is kept; nothing after it is taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopAfter {
    t_stop: f64,
}

impl StopAfter {
    /// Creates an observer that stops at or after `t_stop`.
    #[must_use]
    pub fn new(t_stop: f64) -> Self {
        Self { t_stop }
    }

    /// Returns the stopping time.
    #[must_use]
    pub fn t_stop(&self) -> f64 {
        self.t_stop
    }
}

impl<E: HasTime, A: CanStopEarly> Observer<E, A> for StopAfter {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.t() >= self.t_stop).then(A::stop_early)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use runge_solvers::{
        integrate::fixed::{FixedStep, Status},
        methods,
    };

    #[test]
    fn stops_a_fixed_step_solve() {
        let mut solver = FixedStep::new(|_t: f64, u: &[f64]| vec![u[0]], methods::heun());
        solver.set_initial_condition(1.0).unwrap();

        let solution = solver
            .solve_observed((0.0, 1.0), 10, StopAfter::new(0.45))
            .unwrap();

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.steps, 5);
        assert_eq!(solution.trajectory.len(), 6);
    }
}
