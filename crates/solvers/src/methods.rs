//! Stepping strategies: how one step of a Runge-Kutta method is taken.
//!
//! Every strategy implements [`Stepper`], whose single capability is to
//! advance a [`State`] by `state.dt` and report the new solution. The
//! integrators in [`crate::integrate`] own the time loop and never need to
//! know which strategy they drive.
//!
//! Methods are data. Each strategy is parameterized by a [`ButcherTableau`],
//! so the named methods below differ only in their coefficients:
//!
//! | strategy | stage policy | tableaus |
//! |----------|--------------|----------|
//! | [`ExplicitRk`] | evaluated in sequence, no solve | forward Euler, Heun, explicit midpoint, RK4, Euler-Heun, RKF45 |
//! | [`CoupledImplicitRk`] | one joint solve over all stages | backward Euler, implicit midpoint, Radau IIA (2 and 3 stages) |
//! | [`SequentialImplicitRk`] | one solve per stage (SDIRK/ESDIRK) | SDIRK2, TR-BDF2, embedded TR-BDF2 |
//!
//! Strategies own their stage buffers and take `&mut self`, so a single
//! instance cannot be shared by two concurrent solves.

mod explicit;
mod implicit;
mod sdirk;
mod stages;

pub use explicit::ExplicitRk;
pub use implicit::CoupledImplicitRk;
pub use sdirk::SequentialImplicitRk;

use runge_core::{ButcherTableau, DimensionError, OdeSystem, Rhs, State};
use thiserror::Error;

use crate::equation::{Newton, StageSolution, Status};

/// Advances an integrator state by one step.
pub trait Stepper {
    /// Returns the tableau that defines this strategy.
    fn tableau(&self) -> &ButcherTableau;

    /// Returns the nominal order of the strategy's update formula.
    fn order(&self) -> u32 {
        self.tableau().order()
    }

    /// Computes the solution one step of size `state.dt` after `state`.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if the right-hand side returns a derivative
    /// of the wrong length. Stage-solve failures are not errors; they are
    /// reported through [`Advance::failure`].
    fn advance<S: OdeSystem>(
        &mut self,
        rhs: &Rhs<'_, S>,
        state: &State,
    ) -> Result<Advance, DimensionError>;
}

/// The outcome of one step attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    /// The tentative solution `u_{n+1}`.
    pub u: Vec<f64>,

    /// Local error estimate `‖dt·Σ e_i·k_i‖₂`, for embedded tableaus.
    ///
    /// NaN when a stage solve failed.
    pub error: Option<f64>,

    /// Set when a nonlinear stage solve did not converge.
    ///
    /// `u` is then built from the solver's last iterates.
    pub failure: Option<StageFailure>,
}

/// A nonlinear stage solve that did not converge.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("stage solve {status:?} after {iters} iterations (residual {residual_norm:e})")]
pub struct StageFailure {
    /// Index of the failing stage, or `None` for a fully coupled solve.
    pub stage: Option<usize>,

    /// How the solver terminated.
    pub status: Status,

    /// Iterations performed.
    pub iters: usize,

    /// Residual infinity-norm at the last iterate.
    pub residual_norm: f64,
}

impl StageFailure {
    pub(crate) fn from_solution(stage: Option<usize>, solution: &StageSolution) -> Self {
        Self {
            stage,
            status: solution.status,
            iters: solution.iters,
            residual_norm: solution.residual_norm,
        }
    }
}

// Known-good tableaus below, unwrap is safe.

/// Forward Euler.
#[must_use]
pub fn forward_euler() -> ExplicitRk {
    ExplicitRk::new(ButcherTableau::forward_euler()).unwrap()
}

/// Heun's method.
#[must_use]
pub fn heun() -> ExplicitRk {
    ExplicitRk::new(ButcherTableau::heun()).unwrap()
}

/// Explicit midpoint.
#[must_use]
pub fn explicit_midpoint() -> ExplicitRk {
    ExplicitRk::new(ButcherTableau::explicit_midpoint()).unwrap()
}

/// Classical fourth-order Runge-Kutta.
#[must_use]
pub fn rk4() -> ExplicitRk {
    ExplicitRk::new(ButcherTableau::rk4()).unwrap()
}

/// Euler-Heun embedded pair, for adaptive stepping.
#[must_use]
pub fn euler_heun() -> ExplicitRk {
    ExplicitRk::new(ButcherTableau::euler_heun()).unwrap()
}

/// Runge-Kutta-Fehlberg 4(5), for adaptive stepping.
#[must_use]
pub fn rkf45() -> ExplicitRk {
    ExplicitRk::new(ButcherTableau::rkf45()).unwrap()
}

/// Backward Euler with the default Newton stage solver.
#[must_use]
pub fn backward_euler() -> CoupledImplicitRk<Newton> {
    CoupledImplicitRk::new(ButcherTableau::backward_euler())
}

/// Implicit midpoint with the default Newton stage solver.
#[must_use]
pub fn implicit_midpoint() -> CoupledImplicitRk<Newton> {
    CoupledImplicitRk::new(ButcherTableau::implicit_midpoint())
}

/// Two-stage Radau IIA with the default Newton stage solver.
#[must_use]
pub fn radau2() -> CoupledImplicitRk<Newton> {
    CoupledImplicitRk::new(ButcherTableau::radau2())
}

/// Three-stage Radau IIA with the default Newton stage solver.
#[must_use]
pub fn radau3() -> CoupledImplicitRk<Newton> {
    CoupledImplicitRk::new(ButcherTableau::radau3())
}

/// Two-stage SDIRK with the default Newton stage solver.
#[must_use]
pub fn sdirk2() -> SequentialImplicitRk<Newton> {
    SequentialImplicitRk::new(ButcherTableau::sdirk2()).unwrap()
}

/// TR-BDF2 with the default Newton stage solver.
#[must_use]
pub fn tr_bdf2() -> SequentialImplicitRk<Newton> {
    SequentialImplicitRk::new(ButcherTableau::tr_bdf2()).unwrap()
}

/// TR-BDF2 with an embedded error estimate, for adaptive stepping of stiff
/// problems.
#[must_use]
pub fn tr_bdf2_adaptive() -> SequentialImplicitRk<Newton> {
    SequentialImplicitRk::new(ButcherTableau::tr_bdf2_embedded()).unwrap()
}
