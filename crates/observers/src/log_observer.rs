use log::{debug, info};
use runge_core::Observer;

use crate::traits::{HasAcceptance, HasStepSize, HasTime};

/// An observer that reports integration progress through the `log` facade.
///
/// Accepted steps are logged at `info` level, rejected steps at `debug`. Use
/// [`LogObserver::every`] to thin out long runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogObserver {
    every: usize,
    accepted: usize,
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LogObserver {
    /// Creates an observer that logs every accepted step.
    #[must_use]
    pub fn new() -> Self {
        Self {
            every: 1,
            accepted: 0,
        }
    }

    /// Logs only every `n`th accepted step. Zero is treated as one.
    #[must_use]
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }

    /// Returns the number of accepted steps seen so far.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl<E, A> Observer<E, A> for LogObserver
where
    E: HasTime + HasStepSize + HasAcceptance,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let Some(dt) = event.dt() else {
            info!("start at t = {}", event.t());
            return None;
        };

        if !event.is_accepted() {
            debug!("rejected dt = {dt:e} at t = {}", event.t());
            return None;
        }

        self.accepted += 1;
        if self.accepted % self.every == 0 {
            info!("step {}: t = {}, dt = {dt:e}", self.accepted, event.t());
        }
        None
    }
}
