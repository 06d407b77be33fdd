//! Fixed-step integration.
//!
//! Advances an initial-value problem over a prescribed time grid, either `N`
//! equal steps across `(t0, T)` or an explicit list of grid points:
//!
//! ```text
//! u_{n+1} = advance(t_n, u_n, t_{n+1} − t_n)
//! ```
//!
//! The trajectory always has one row per grid point, and the last grid point
//! is exactly `T`. A span with `t0 > T` integrates backward with negative
//! steps. A stage solve that fails to converge ends the integration
//! with [`Error::StageSolve`], since a fixed grid has no way to retry.
//!
//! # Example
//!
//! ```
//! use runge_solvers::{integrate::fixed::FixedStep, methods};
//!
//! // u' = −u, u(0) = 1
//! let mut solver = FixedStep::new(|_t: f64, u: &[f64]| vec![-u[0]], methods::heun());
//! solver.set_initial_condition(1.0).unwrap();
//!
//! let solution = solver.solve((0.0, 2.0), 200).unwrap();
//! assert_eq!(solution.trajectory.len(), 201);
//! ```

mod action;
mod error;
mod event;
mod solution;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use log::{debug, warn};
use runge_core::{InitialCondition, Observer, OdeSystem, Rhs, State, Trajectory};

use crate::methods::Stepper;

use super::{
    InitialSlot, PreconditionError, check_either_span, initial_derivative, is_monotone_grid,
};

/// A fixed-step integrator over a system `S` and stepping strategy `M`.
#[derive(Debug, Clone)]
pub struct FixedStep<S, M> {
    system: S,
    stepper: M,
    initial: InitialSlot,
}

impl<S: OdeSystem, M: Stepper> FixedStep<S, M> {
    /// Creates an integrator with no initial condition.
    pub fn new(system: S, stepper: M) -> Self {
        Self {
            system,
            stepper,
            initial: InitialSlot::default(),
        }
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

    /// Integrates over `t_span` in `steps` equal steps.
    ///
    /// # Errors
    ///
    /// See [`FixedStep::solve_observed`].
    pub fn solve(&mut self, t_span: (f64, f64), steps: usize) -> Result<Solution, Error> {
        self.solve_observed(t_span, steps, ())
    }

    /// Integrates over `t_span` in `steps` equal steps, reporting each grid
    /// point to `observer`.
    ///
    /// # Observer
    ///
    /// The observer receives an [`Event`] for the initial condition and after
    /// every step, and may return [`Action::StopEarly`] to end the integration.
    ///
    /// # Errors
    ///
    /// Returns a [`PreconditionError`] if `steps` is zero, the span is not a
    /// finite non-empty interval, the initial condition is missing, or
    /// `f(t0, u0)` has the wrong length. Returns [`Error::StageSolve`] if an
    /// implicit stage solve fails, and [`Error::Dimension`] if the system
    /// changes its output length mid-solve.
    pub fn solve_observed<O>(
        &mut self,
        t_span: (f64, f64),
        steps: usize,
        observer: O,
    ) -> Result<Solution, Error>
    where
        O: Observer<Event, Action>,
    {
        if steps == 0 {
            return Err(PreconditionError::ZeroSteps.into());
        }
        check_either_span(t_span)?;

        let (t0, t_end) = t_span;
        let dt = (t_end - t0) / steps as f64;
        let grid: Vec<f64> = (0..=steps)
            .map(|n| if n == steps { t_end } else { t0 + n as f64 * dt })
            .collect();

        self.run(&grid, observer)
    }

    /// Integrates across the given grid points.
    ///
    /// # Errors
    ///
    /// See [`FixedStep::solve_on_grid_observed`].
    pub fn solve_on_grid(&mut self, times: &[f64]) -> Result<Solution, Error> {
        self.solve_on_grid_observed(times, ())
    }

    /// Integrates across the given grid points, reporting each one to
    /// `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError::InvalidGrid`] unless `times` has at least
    /// two finite points that strictly ascend or strictly descend; otherwise fails as
    /// [`FixedStep::solve_observed`] does.
    pub fn solve_on_grid_observed<O>(&mut self, times: &[f64], observer: O) -> Result<Solution, Error>
    where
        O: Observer<Event, Action>,
    {
        if !is_monotone_grid(times) {
            return Err(PreconditionError::InvalidGrid.into());
        }

        self.run(times, observer)
    }

    fn run<O>(&mut self, grid: &[f64], observer: O) -> Result<Solution, Error>
    where
        O: Observer<Event, Action>,
    {
        let u0 = self.initial.get()?.as_slice().to_vec();
        let solution = integrate(&self.system, &mut self.stepper, grid, u0, observer)?;
        self.initial.lock();
        Ok(solution)
    }
}

fn integrate<S, M, O>(
    system: &S,
    stepper: &mut M,
    grid: &[f64],
    u0: Vec<f64>,
    mut observer: O,
) -> Result<Solution, Error>
where
    S: OdeSystem,
    M: Stepper,
    O: Observer<Event, Action>,
{
    let rhs = Rhs::new(system, u0.len());
    initial_derivative(&rhs, grid[0], &u0)?;

    let steps = grid.len() - 1;
    debug!(
        "fixed: {steps} steps over ({}, {}), neq = {}",
        grid[0],
        grid[steps],
        u0.len()
    );

    let mut trajectory = Trajectory::with_capacity(grid.len());
    trajectory.push(grid[0], u0.clone());
    let mut state = State::new(grid[0], u0);

    let event = Event {
        step: 0,
        t: state.t,
        dt: None,
        u: state.u.clone(),
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(finish(Status::StoppedByObserver, trajectory, 0, &rhs));
    }

    for step in 1..=steps {
        state.dt = grid[step] - grid[step - 1];

        let advance = stepper
            .advance(&rhs, &state)
            .map_err(|source| Error::Dimension { step, source })?;
        if let Some(failure) = advance.failure {
            warn!("fixed: stage solve failed on step {step} at t = {}: {failure}", state.t);
            return Err(Error::StageSolve {
                step,
                t: state.t,
                u: state.u,
                failure,
            });
        }

        state.t = grid[step];
        state.u = advance.u;
        state.n = step;
        trajectory.push(state.t, state.u.clone());

        let event = Event {
            step,
            t: state.t,
            dt: Some(state.dt),
            u: state.u.clone(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            debug!("fixed: stopped by observer after step {step}");
            return Ok(finish(Status::StoppedByObserver, trajectory, step, &rhs));
        }
    }

    debug!("fixed: complete after {} evaluations", rhs.evals());
    Ok(finish(Status::Complete, trajectory, steps, &rhs))
}

fn finish<S: OdeSystem>(
    status: Status,
    trajectory: Trajectory,
    steps: usize,
    rhs: &Rhs<'_, S>,
) -> Solution {
    Solution {
        status,
        trajectory,
        steps,
        evals: rhs.evals(),
    }
}
