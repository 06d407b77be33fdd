//! Capability traits for cross-solver observers.
//!
//! These traits abstract over integrator-specific event and action types,
//! enabling observers to work generically across integrators.
//!
//! # Event traits
//!
//! - [`HasTime`] — events that carry a time
//! - [`HasStepSize`] — events that carry the size of the step taken
//! - [`HasProposedStep`] — events that carry a controller's next step size
//! - [`HasAcceptance`] — events that may describe a rejected step
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use runge_core::Observer;
//! use runge_observers::traits::{CanStopEarly, HasStepSize};
//!
//! /// Stops once a step shrinks below `floor`.
//! struct TooSmall {
//!     floor: f64,
//! }
//!
//! impl<E: HasStepSize, A: CanStopEarly> Observer<E, A> for TooSmall {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         match event.dt() {
//!             Some(dt) if dt < self.floor => Some(A::stop_early()),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use runge_solvers::integrate::{adaptive, fixed};

/// An event that carries a time.
pub trait HasTime {
    /// Returns the time this event refers to.
    ///
    /// For a rejected step this is the time the step started from.
    fn t(&self) -> f64;
}

/// An event that carries the size of the step taken or attempted.
pub trait HasStepSize {
    /// Returns the step size, or `None` if the event is not a step.
    fn dt(&self) -> Option<f64>;
}

/// An event that carries the step size a controller chose next.
pub trait HasProposedStep {
    /// Returns the next step size, or `None` for integrators without a
    /// controller.
    fn next_dt(&self) -> Option<f64>;
}

/// An event that reports whether a step was kept.
pub trait HasAcceptance {
    /// Returns true if the step was accepted.
    fn is_accepted(&self) -> bool;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the integrator early.
    fn stop_early() -> Self;
}

// --- fixed::Event ---

impl HasTime for fixed::Event {
    fn t(&self) -> f64 {
        self.t
    }
}

impl HasStepSize for fixed::Event {
    fn dt(&self) -> Option<f64> {
        self.dt
    }
}

impl HasProposedStep for fixed::Event {
    fn next_dt(&self) -> Option<f64> {
        None
    }
}

impl HasAcceptance for fixed::Event {
    fn is_accepted(&self) -> bool {
        true
    }
}

// --- adaptive::Event ---

impl HasTime for adaptive::Event {
    fn t(&self) -> f64 {
        match self {
            adaptive::Event::Accepted { t, .. } | adaptive::Event::Rejected { t, .. } => *t,
        }
    }
}

impl HasStepSize for adaptive::Event {
    fn dt(&self) -> Option<f64> {
        match self {
            adaptive::Event::Accepted { dt, .. } | adaptive::Event::Rejected { dt, .. } => {
                Some(*dt)
            }
        }
    }
}

impl HasProposedStep for adaptive::Event {
    fn next_dt(&self) -> Option<f64> {
        match self {
            adaptive::Event::Accepted { next_dt, .. }
            | adaptive::Event::Rejected { next_dt, .. } => Some(*next_dt),
        }
    }
}

impl HasAcceptance for adaptive::Event {
    fn is_accepted(&self) -> bool {
        adaptive::Event::is_accepted(self)
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for fixed::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for adaptive::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
