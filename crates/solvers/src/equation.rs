//! Nonlinear stage solvers for implicit Runge-Kutta methods.
//!
//! Implicit strategies reduce each step to a root-finding problem
//! `r(k) = 0` over the stage derivatives. A [`StageSolver`] is anything that
//! can drive such a residual toward zero from an initial guess and report
//! whether it got there.
//!
//! The contract is intentionally small:
//!
//! - the residual writes `r(x)` into a caller-provided buffer and may fail
//!   with the caller's own error type, which aborts the solve
//! - the solver returns its final iterate together with a [`Status`], so a
//!   non-converged solve is an outcome, not an error
//!
//! # Solvers
//!
//! - [`newton`] — Newton iteration with a finite-difference Jacobian

mod linear;

pub mod newton;

pub use newton::Newton;

/// Indicates how a stage solve terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the solver's tolerances.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// The Jacobian could not be factored.
    SingularJacobian,

    /// The residual or iterate stopped being finite.
    NonFinite,
}

/// The result of a stage solve.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSolution {
    /// How the solve terminated.
    pub status: Status,

    /// Final iterate. When the solve did not converge this is the last
    /// iterate the solver produced.
    pub x: Vec<f64>,

    /// Infinity norm of the residual at `x`.
    pub residual_norm: f64,

    /// Number of iterations performed.
    pub iters: usize,
}

impl StageSolution {
    /// Returns true if the solve converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}

/// Finds a root of a residual function, starting from a guess.
pub trait StageSolver {
    /// Drives `residual` toward zero starting from `guess`.
    ///
    /// `residual(x, r)` must write one residual per unknown into `r`, which
    /// has the same length as `x` and `guess`.
    ///
    /// # Errors
    ///
    /// Returns the residual's error if any residual evaluation fails.
    /// Convergence failures are reported through [`StageSolution::status`].
    fn solve<R, E>(&mut self, residual: R, guess: &[f64]) -> Result<StageSolution, E>
    where
        R: FnMut(&[f64], &mut [f64]) -> Result<(), E>;
}

/// Returns the infinity norm of `v`, propagating NaN.
pub(crate) fn max_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| {
        if acc.is_nan() || x.is_nan() {
            f64::NAN
        } else {
            acc.max(x.abs())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_norm_picks_largest_magnitude() {
        assert_eq!(max_norm(&[1.0, -3.0, 2.0]), 3.0);
        assert_eq!(max_norm(&[]), 0.0);
    }

    #[test]
    fn max_norm_propagates_nan() {
        assert!(max_norm(&[1.0, f64::NAN, 2.0]).is_nan());
    }

    #[test]
    fn max_norm_of_infinity_is_infinite() {
        assert_eq!(max_norm(&[f64::NEG_INFINITY, 1.0]), f64::INFINITY);
    }
}
