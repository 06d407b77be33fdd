//! Integrators: the time loops that drive a stepping strategy.
//!
//! - [`fixed`] takes a prescribed number of equal steps, or follows a
//!   caller-supplied time grid.
//! - [`adaptive`] chooses each step from an embedded error estimate.
//!
//! Both accept any [`Stepper`](crate::methods::Stepper), own their system, and
//! hold an initial condition that must be set before the first solve. The
//! initial condition is locked once a solve succeeds, so a solver value always
//! describes a single initial-value problem.

pub mod adaptive;
pub mod fixed;

pub use adaptive::Adaptive;
pub use fixed::FixedStep;

use runge_core::{InitialCondition, OdeSystem, Rhs};
use thiserror::Error;

/// Problems detected before any step is taken.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreconditionError {
    #[error("no initial condition has been set")]
    MissingInitialCondition,

    #[error("initial condition must have at least one component")]
    EmptyInitialCondition,

    #[error("initial condition cannot change after a successful solve")]
    InitialConditionLocked,

    #[error("derivative at t0 has {found} components, initial condition has {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("number of steps must be at least 1")]
    ZeroSteps,

    #[error("time span must be finite and non-empty, got ({t0}, {t_end})")]
    InvalidTimeSpan { t0: f64, t_end: f64 },

    #[error("time grid must have at least two finite, strictly monotone points")]
    InvalidGrid,

    #[error("adaptive stepping requires a tableau with error weights")]
    NotEmbedded,
}

/// The initial condition held by an integrator.
#[derive(Debug, Clone, Default)]
pub(crate) struct InitialSlot {
    value: Option<InitialCondition>,
    locked: bool,
}

impl InitialSlot {
    pub(crate) fn set(&mut self, value: InitialCondition) -> Result<(), PreconditionError> {
        if self.locked {
            return Err(PreconditionError::InitialConditionLocked);
        }
        if value.neq() == 0 {
            return Err(PreconditionError::EmptyInitialCondition);
        }
        self.value = Some(value);
        Ok(())
    }

    pub(crate) fn get(&self) -> Result<&InitialCondition, PreconditionError> {
        self.value
            .as_ref()
            .ok_or(PreconditionError::MissingInitialCondition)
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }
}

/// Evaluates `f(t0, u0)` and checks it has one component per equation.
pub(crate) fn initial_derivative<S: OdeSystem>(
    rhs: &Rhs<'_, S>,
    t0: f64,
    u0: &[f64],
) -> Result<Vec<f64>, PreconditionError> {
    rhs.eval_vec(t0, u0)
        .map_err(|err| PreconditionError::DimensionMismatch {
            expected: err.expected,
            found: err.found,
        })
}

pub(crate) fn check_span((t0, t_end): (f64, f64)) -> Result<(), PreconditionError> {
    if t0.is_finite() && t_end.is_finite() && t0 < t_end {
        Ok(())
    } else {
        Err(PreconditionError::InvalidTimeSpan { t0, t_end })
    }
}

/// Like [`check_span`], but also accepts `t0 > T` for integrating backward.
pub(crate) fn check_either_span((t0, t_end): (f64, f64)) -> Result<(), PreconditionError> {
    if t0.is_finite() && t_end.is_finite() && t0 != t_end {
        Ok(())
    } else {
        Err(PreconditionError::InvalidTimeSpan { t0, t_end })
    }
}

/// Returns true for at least two finite points that strictly ascend or
/// strictly descend.
pub(crate) fn is_monotone_grid(times: &[f64]) -> bool {
    times.len() >= 2
        && times.iter().all(|t| t.is_finite())
        && (times.windows(2).all(|w| w[0] < w[1]) || times.windows(2).all(|w| w[0] > w[1]))
}
