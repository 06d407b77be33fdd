//! Adaptive integration with an embedded error estimate.
//!
//! Each step is attempted with the current `dt`. The stepping strategy reports
//! the local error `err = ‖dt·Σ e_i·k_i‖₂`, and the controller proposes
//!
//! ```text
//! dt_new = η·(tol/err)^(1/(p+1))·dt,   clamped to [min_dt, max_dt]
//! ```
//!
//! where `p` is the order of the strategy's update formula.
//!
//! # Acceptance
//!
//! A step is accepted when `err < tol`, or when `dt ≤ min_dt` (the step cannot
//! shrink any further, so it is taken anyway and counted in
//! [`Solution::forced`]). An accepted step appends `(t + dt, u_new)` to the
//! trajectory and continues with `min(dt_new, T − t)`, so the last step lands
//! exactly on `T`. A rejected step is retried from the same state with
//! `dt_new`.
//!
//! A stage solve that fails to converge yields a NaN error, so the step is
//! retried at `min_dt` and then accepted.
//!
//! # Initial step
//!
//! The first step is `0.1 / ‖f(t0, u0)‖₂`, limited to the span `T − t0`.
//!
//! # Example
//!
//! ```
//! use runge_solvers::{integrate::adaptive::{Adaptive, Config}, methods};
//!
//! let mut solver = Adaptive::new(|_t: f64, u: &[f64]| vec![-u[0]], methods::rkf45()).unwrap();
//! solver.set_initial_condition(1.0).unwrap();
//!
//! let config = Config::new(1e-8, 0.5, 1e-6).unwrap();
//! let solution = solver.solve((0.0, 5.0), &config).unwrap();
//!
//! let (t, u) = solution.trajectory.last().unwrap();
//! assert_eq!(t, 5.0);
//! assert!((u[0] - (-5.0_f64).exp()).abs() < 1e-6);
//! ```

mod action;
mod config;
mod controller;
mod error;
mod event;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use log::{debug, warn};
use runge_core::{InitialCondition, Observer, OdeSystem, Rhs, State, Trajectory};

use crate::methods::Stepper;

use super::{InitialSlot, PreconditionError, check_span, initial_derivative};

/// An adaptive integrator over a system `S` and embedded stepping strategy `M`.
#[derive(Debug, Clone)]
pub struct Adaptive<S, M> {
    system: S,
    stepper: M,
    initial: InitialSlot,
}

impl<S: OdeSystem, M: Stepper> Adaptive<S, M> {
    /// Creates an adaptive integrator with no initial condition.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError::NotEmbedded`] if the strategy's tableau has
    /// no error weights.
    pub fn new(system: S, stepper: M) -> Result<Self, PreconditionError> {
        if !stepper.tableau().is_embedded() {
            return Err(PreconditionError::NotEmbedded);
        }
        Ok(Self {
            system,
            stepper,
            initial: InitialSlot::default(),
        })
    }

    /// Sets the initial condition, which fixes the number of equations.
    ///
    /// # Errors
    ///
    /// Returns an error if `u0` is empty or a solve has already succeeded.
    pub fn set_initial_condition(
        &mut self,
        u0: impl Into<InitialCondition>,
    ) -> Result<(), PreconditionError> {
        self.initial.set(u0.into())
    }

    /// Returns the initial condition, if set.
    pub fn initial_condition(&self) -> Option<&InitialCondition> {
        self.initial.get().ok()
    }

    /// Returns the stepping strategy.
    pub fn stepper(&self) -> &M {
        &self.stepper
    }

    /// Integrates over `t_span` with the given controller settings.
    ///
    /// # Errors
    ///
    /// See [`Adaptive::solve_observed`].
    pub fn solve(&mut self, t_span: (f64, f64), config: &Config) -> Result<Solution, Error> {
        self.solve_observed(t_span, config, ())
    }

    /// Integrates over `t_span`, reporting every step attempt to `observer`.
    ///
    /// # Observer
    ///
    /// The observer receives an [`Event`] after every accepted or rejected
    /// step and may return [`Action::StopEarly`] to end the integration.
    ///
    /// # Errors
    ///
    /// Returns a [`PreconditionError`] if the span is not a finite ascending
    /// interval, the initial condition is missing, or `f(t0, u0)` has the
    /// wrong length. Returns [`Error::Dimension`] if the system changes its
    /// output length mid-solve and [`Error::StepSizeUnderflow`] if a step is
    /// too small to advance `t`.
    pub fn solve_observed<O>(
        &mut self,
        t_span: (f64, f64),
        config: &Config,
        observer: O,
    ) -> Result<Solution, Error>
    where
        O: Observer<Event, Action>,
    {
        check_span(t_span)?;
        let u0 = self.initial.get()?.as_slice().to_vec();
        let solution = integrate(&self.system, &mut self.stepper, t_span, u0, config, observer)?;
        self.initial.lock();
        Ok(solution)
    }
}

fn integrate<S, M, O>(
    system: &S,
    stepper: &mut M,
    (t0, t_end): (f64, f64),
    u0: Vec<f64>,
    config: &Config,
    mut observer: O,
) -> Result<Solution, Error>
where
    S: OdeSystem,
    M: Stepper,
    O: Observer<Event, Action>,
{
    let rhs = Rhs::new(system, u0.len());
    let f0 = initial_derivative(&rhs, t0, &u0)?;

    let order = stepper.order();
    let mut state = State::new(t0, u0);
    state.dt = initial_step(&f0, t_end - t0);
    debug!(
        "adaptive: ({t0}, {t_end}), neq = {}, tol = {:e}, initial dt = {:e}",
        state.neq(),
        config.tol(),
        state.dt
    );

    let mut trajectory = Trajectory::new();
    trajectory.push(t0, state.u.clone());
    let mut rejected = 0;
    let mut forced = 0;

    let finish = |status, trajectory, rejected, forced, state: &State| Solution {
        status,
        trajectory,
        accepted: state.n,
        rejected,
        forced,
        evals: rhs.evals(),
    };

    while state.t < t_end {
        let dt = state.dt;
        let advance = stepper.advance(&rhs, &state).map_err(|source| Error::Dimension {
            t: state.t,
            source,
        })?;
        let error = advance.error.unwrap_or(f64::NAN);
        let next_dt = controller::propose(dt, error, order, config);

        let within_tol = error < config.tol();
        if !within_tol && dt > config.min_dt() {
            rejected += 1;
            debug!(
                "adaptive: rejected dt = {dt:e} at t = {}, error = {error:e}, retry with {next_dt:e}",
                state.t
            );
            state.dt = next_dt;

            let event = Event::Rejected {
                t: state.t,
                dt,
                error,
                next_dt,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                return Ok(finish(Status::StoppedByObserver, trajectory, rejected, forced, &state));
            }
            continue;
        }

        if !within_tol {
            forced += 1;
            match &advance.failure {
                Some(failure) => warn!(
                    "adaptive: accepting dt = {dt:e} at t = {} after failed stage solve: {failure}",
                    state.t
                ),
                None => warn!(
                    "adaptive: accepting dt = {dt:e} at t = {} with error {error:e} above tolerance",
                    state.t
                ),
            }
        }

        let t_next = if dt >= t_end - state.t {
            t_end
        } else {
            state.t + dt
        };
        if t_next <= state.t {
            return Err(Error::StepSizeUnderflow { t: state.t, dt });
        }

        state.t = t_next;
        state.u = advance.u;
        state.n += 1;
        state.dt = next_dt.min(t_end - state.t);
        trajectory.push(state.t, state.u.clone());

        let event = Event::Accepted {
            step: state.n,
            t: state.t,
            dt,
            error,
            next_dt: state.dt,
            u: state.u.clone(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            debug!("adaptive: stopped by observer at t = {}", state.t);
            return Ok(finish(Status::StoppedByObserver, trajectory, rejected, forced, &state));
        }
    }

    debug!(
        "adaptive: complete, {} accepted, {rejected} rejected, {forced} forced, {} evaluations",
        state.n,
        rhs.evals()
    );
    Ok(finish(Status::Complete, trajectory, rejected, forced, &state))
}

/// Returns `0.1 / ‖f0‖₂`, limited to `span`.
fn initial_step(f0: &[f64], span: f64) -> f64 {
    let norm = f0.iter().map(|v| v * v).sum::<f64>().sqrt();
    let dt = 0.1 / norm;
    if dt.is_finite() && dt < span { dt } else { span }
}
