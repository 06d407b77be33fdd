//! Right-hand sides of ordinary differential equations.
//!
//! Users describe an ODE `u'(t) = f(t, u)` by implementing [`OdeSystem`] (or by
//! passing a closure, which implements it automatically). Integrators never
//! call the system directly; they go through [`Rhs`], which pins the number of
//! equations for the duration of a solve and rejects derivatives whose length
//! does not match.

use std::cell::Cell;

use thiserror::Error;

/// The right-hand side `f(t, u)` of an ODE system.
///
/// Implementations must be pure: the same `(t, u)` always yields the same
/// derivative, and `u` is never mutated. Integrators evaluate the system once
/// per stage and, for implicit methods, at intermediate states produced by the
/// nonlinear stage solver, so `f` must tolerate non-physical values.
///
/// # Example
///
/// ```
/// use runge_core::OdeSystem;
///
/// struct Decay {
///     rate: f64,
/// }
///
/// impl OdeSystem for Decay {
///     fn derivative(&self, _t: f64, u: &[f64]) -> Vec<f64> {
///         u.iter().map(|ui| -self.rate * ui).collect()
///     }
/// }
///
/// let du = Decay { rate: 2.0 }.derivative(0.0, &[1.0, 0.5]);
/// assert_eq!(du, vec![-2.0, -1.0]);
/// ```
pub trait OdeSystem {
    /// Returns `du/dt` at time `t` and state `u`.
    fn derivative(&self, t: f64, u: &[f64]) -> Vec<f64>;
}

impl<F> OdeSystem for F
where
    F: Fn(f64, &[f64]) -> Vec<f64>,
{
    fn derivative(&self, t: f64, u: &[f64]) -> Vec<f64> {
        self(t, u)
    }
}

/// Adapts a scalar function `f(t, u) -> du` into a one-equation [`OdeSystem`].
///
/// The adapted system always returns a single component, so using it with a
/// vector initial condition of more than one component is reported as a
/// [`DimensionError`] before integration starts.
///
/// ```
/// use runge_core::{OdeSystem, Scalar};
///
/// let growth = Scalar(|_t: f64, u: f64| 0.5 * u);
/// assert_eq!(growth.derivative(0.0, &[2.0]), vec![1.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Scalar<F>(pub F);

impl<F> OdeSystem for Scalar<F>
where
    F: Fn(f64, f64) -> f64,
{
    fn derivative(&self, t: f64, u: &[f64]) -> Vec<f64> {
        u.first().map(|&u0| vec![(self.0)(t, u0)]).unwrap_or_default()
    }
}

/// A derivative whose length differs from the number of equations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("derivative has {found} components, expected {expected}")]
pub struct DimensionError {
    pub expected: usize,
    pub found: usize,
}

/// A system bound to a fixed number of equations.
///
/// `Rhs` is created by an integrator once the initial condition is known and
/// lives for a single solve. It counts evaluations so solvers can report them.
#[derive(Debug)]
pub struct Rhs<'a, S> {
    system: &'a S,
    neq: usize,
    evals: Cell<usize>,
}

impl<'a, S: OdeSystem> Rhs<'a, S> {
    /// Binds `system` to `neq` equations.
    #[must_use]
    pub fn new(system: &'a S, neq: usize) -> Self {
        Self {
            system,
            neq,
            evals: Cell::new(0),
        }
    }

    /// Returns the number of equations.
    #[must_use]
    pub fn neq(&self) -> usize {
        self.neq
    }

    /// Returns how many times the system has been evaluated.
    #[must_use]
    pub fn evals(&self) -> usize {
        self.evals.get()
    }

    /// Evaluates the system at `(t, u)` and writes the derivative into `out`.
    ///
    /// `out` must hold exactly [`neq`](Self::neq) values.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if the system returns a derivative with a
    /// different number of components. `out` is left untouched in that case.
    pub fn eval(&self, t: f64, u: &[f64], out: &mut [f64]) -> Result<(), DimensionError> {
        self.evals.set(self.evals.get() + 1);

        let du = self.system.derivative(t, u);
        if du.len() != self.neq {
            return Err(DimensionError {
                expected: self.neq,
                found: du.len(),
            });
        }
        out.copy_from_slice(&du);
        Ok(())
    }

    /// Evaluates the system at `(t, u)` into a freshly allocated vector.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if the derivative has the wrong length.
    pub fn eval_vec(&self, t: f64, u: &[f64]) -> Result<Vec<f64>, DimensionError> {
        let mut out = vec![0.0; self.neq];
        self.eval(t, u, &mut out)?;
        Ok(out)
    }
}
