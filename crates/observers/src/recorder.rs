use runge_core::Observer;

use crate::traits::{HasAcceptance, HasProposedStep, HasStepSize, HasTime};

/// An observer that records the step-size history of an integration.
///
/// For every accepted step it stores the time reached and the step taken.
/// For every event from a controller (accepted or rejected) it stores the
/// proposed next step size, and it counts rejections.
///
/// Pass `&mut recorder` as the observer to keep the recorder after the solve.
///
/// # Example
///
/// ```
/// use runge_observers::StepRecorder;
/// use runge_solvers::{integrate::adaptive::{Adaptive, Config}, methods};
///
/// let mut solver = Adaptive::new(|_t: f64, u: &[f64]| vec![-u[0]], methods::rkf45()).unwrap();
/// solver.set_initial_condition(1.0).unwrap();
///
/// let mut recorder = StepRecorder::new();
/// solver
///     .solve_observed((0.0, 1.0), &Config::default(), &mut recorder)
///     .unwrap();
///
/// assert_eq!(recorder.times().last(), Some(&1.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepRecorder {
    times: Vec<f64>,
    steps: Vec<f64>,
    proposed: Vec<f64>,
    rejections: usize,
}

impl StepRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a single event.
    pub fn record<E>(&mut self, event: &E)
    where
        E: HasTime + HasStepSize + HasProposedStep + HasAcceptance,
    {
        if let Some(next_dt) = event.next_dt() {
            self.proposed.push(next_dt);
        }

        if !event.is_accepted() {
            self.rejections += 1;
            return;
        }
        if let Some(dt) = event.dt() {
            self.times.push(event.t());
            self.steps.push(dt);
        }
    }

    /// Returns the times reached by accepted steps.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the sizes of accepted steps, parallel to [`times`](Self::times).
    #[must_use]
    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Returns every step size proposed by the controller, in order.
    #[must_use]
    pub fn proposed(&self) -> &[f64] {
        &self.proposed
    }

    /// Returns the number of rejected steps.
    #[must_use]
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    /// Returns the number of accepted steps recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if no accepted step has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the smallest and largest accepted step, if any.
    #[must_use]
    pub fn step_range(&self) -> Option<(f64, f64)> {
        self.steps.iter().fold(None, |range, &dt| match range {
            None => Some((dt, dt)),
            Some((lo, hi)) => Some((lo.min(dt), hi.max(dt))),
        })
    }
}

impl<E, A> Observer<E, A> for StepRecorder
where
    E: HasTime + HasStepSize + HasProposedStep + HasAcceptance,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event);
        None
    }
}

/// Allows `&mut StepRecorder` to be passed to integrators that take an
/// observer by value, so the history can be read after the solve completes.
impl<E, A> Observer<E, A> for &mut StepRecorder
where
    E: HasTime + HasStepSize + HasProposedStep + HasAcceptance,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.record(event);
        None
    }
}
