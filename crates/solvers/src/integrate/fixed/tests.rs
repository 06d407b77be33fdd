use super::*;

use approx::assert_relative_eq;
use runge_core::{ButcherTableau, DimensionError, Scalar};

use crate::equation::{StageSolution, StageSolver, Status as SolveStatus};
use crate::methods::{self, CoupledImplicitRk};

// --- Test fixtures ---

fn growth(_t: f64, u: &[f64]) -> Vec<f64> {
    vec![u[0]]
}

/// Stage solver that never converges.
struct GivesUp;

impl StageSolver for GivesUp {
    fn solve<R, E>(&mut self, _residual: R, guess: &[f64]) -> Result<StageSolution, E>
    where
        R: FnMut(&[f64], &mut [f64]) -> Result<(), E>,
    {
        Ok(StageSolution {
            status: SolveStatus::MaxIters,
            x: guess.to_vec(),
            residual_norm: 1.0,
            iters: 50,
        })
    }
}

// --- Tests ---

#[test]
fn forward_euler_growth() {
    let mut solver = FixedStep::new(growth, methods::forward_euler());
    solver.set_initial_condition(1.0).unwrap();

    let solution = solver.solve((0.0, 3.0), 30).unwrap();

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.steps, 30);
    assert_eq!(solution.trajectory.len(), 31);

    let (t, u) = solution.trajectory.last().unwrap();
    assert_eq!(t, 3.0);
    assert_relative_eq!(u[0], 1.1_f64.powi(30), max_relative = 1e-12);
}

#[test]
fn rk4_growth() {
    let mut solver = FixedStep::new(growth, methods::rk4());
    solver.set_initial_condition(1.0).unwrap();

    let solution = solver.solve((0.0, 3.0), 30).unwrap();
    let (_, u) = solution.trajectory.last().unwrap();
    assert_relative_eq!(u[0], 3.0_f64.exp(), max_relative = 1e-5);
}

#[test]
fn last_grid_point_is_exactly_t_end() {
    let mut solver = FixedStep::new(growth, methods::heun());
    solver.set_initial_condition(1.0).unwrap();

    let solution = solver.solve((0.0, 0.3), 3).unwrap();
    let times = solution.trajectory.times();

    assert_eq!(times.len(), 4);
    assert_eq!(times[0], 0.0);
    assert_eq!(times[3], 0.3);
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn counts_evaluations() {
    let mut solver = FixedStep::new(growth, methods::rk4());
    solver.set_initial_condition(1.0).unwrap();

    let solution = solver.solve((0.0, 1.0), 10).unwrap();
    // One check of f(t0, u0), then four stages per step.
    assert_eq!(solution.evals, 1 + 4 * 10);
}

#[test]
fn scalar_system_and_vector_system_agree() {
    let mut scalar = FixedStep::new(Scalar(|t: f64, u: f64| t - u), methods::rk4());
    scalar.set_initial_condition(2.0).unwrap();
    let mut vector = FixedStep::new(|t: f64, u: &[f64]| vec![t - u[0]], methods::rk4());
    vector.set_initial_condition(vec![2.0]).unwrap();

    let a = scalar.solve((0.0, 1.0), 8).unwrap();
    let b = vector.solve((0.0, 1.0), 8).unwrap();

    assert_eq!(a.trajectory.scalar_values(), b.trajectory.scalar_values());
}

#[test]
fn follows_a_custom_grid() {
    // u' = 2 is integrated exactly on any grid.
    let mut solver = FixedStep::new(|_t: f64, _u: &[f64]| vec![2.0], methods::explicit_midpoint());
    solver.set_initial_condition(1.0).unwrap();

    let grid = [0.0, 0.1, 0.15, 0.5, 2.0];
    let solution = solver.solve_on_grid(&grid).unwrap();

    assert_eq!(solution.trajectory.times(), &grid);
    for (t, u) in solution.trajectory.iter() {
        assert_relative_eq!(u[0], 1.0 + 2.0 * t, epsilon = 1e-14);
    }
}

#[test]
fn integrates_backward_over_a_descending_span() {
    // u' = u from u(1) = e back to t = 0.
    let mut solver = FixedStep::new(growth, methods::rk4());
    solver.set_initial_condition(1.0_f64.exp()).unwrap();

    let solution = solver.solve((1.0, 0.0), 20).unwrap();
    let times = solution.trajectory.times();

    assert_eq!(times.len(), 21);
    assert_eq!(times[20], 0.0);
    assert!(times.windows(2).all(|w| w[0] > w[1]));

    let (_, u) = solution.trajectory.last().unwrap();
    assert_relative_eq!(u[0], 1.0, epsilon = 1e-6);
}

#[test]
fn follows_a_descending_grid() {
    let mut solver = FixedStep::new(|_t: f64, _u: &[f64]| vec![2.0], methods::heun());
    solver.set_initial_condition(5.0).unwrap();

    let grid = [2.0, 1.5, 0.25, 0.0];
    let solution = solver.solve_on_grid(&grid).unwrap();

    assert_eq!(solution.trajectory.times(), &grid);
    for (t, u) in solution.trajectory.iter() {
        assert_relative_eq!(u[0], 5.0 + 2.0 * (t - 2.0), epsilon = 1e-14);
    }
}

#[test]
fn observer_can_stop_early() {
    let mut solver = FixedStep::new(growth, methods::heun());
    solver.set_initial_condition(1.0).unwrap();

    let observer = |event: &Event| (event.step >= 5).then_some(Action::StopEarly);
    let solution = solver.solve_observed((0.0, 1.0), 100, observer).unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.steps, 5);
    assert_eq!(solution.trajectory.len(), 6);
}

#[test]
fn events_start_at_the_initial_condition() {
    let mut solver = FixedStep::new(growth, methods::forward_euler());
    solver.set_initial_condition(1.0).unwrap();

    let mut events = Vec::new();
    solver
        .solve_observed((0.0, 1.0), 4, |event: &Event| {
            events.push((event.step, event.dt));
            None
        })
        .unwrap();

    assert_eq!(
        events,
        vec![
            (0, None),
            (1, Some(0.25)),
            (2, Some(0.25)),
            (3, Some(0.25)),
            (4, Some(0.25))
        ]
    );
}

#[test]
fn preconditions_are_checked_before_stepping() {
    let mut solver = FixedStep::new(growth, methods::forward_euler());

    assert!(matches!(
        solver.solve((0.0, 1.0), 10),
        Err(Error::Precondition(PreconditionError::MissingInitialCondition))
    ));

    solver.set_initial_condition(1.0).unwrap();
    assert!(matches!(
        solver.solve((0.0, 1.0), 0),
        Err(Error::Precondition(PreconditionError::ZeroSteps))
    ));
    assert!(matches!(
        solver.solve((1.0, 1.0), 10),
        Err(Error::Precondition(PreconditionError::InvalidTimeSpan { .. }))
    ));
    assert!(matches!(
        solver.solve_on_grid(&[0.0]),
        Err(Error::Precondition(PreconditionError::InvalidGrid))
    ));
    assert!(matches!(
        solver.solve_on_grid(&[0.0, 0.5, 0.5]),
        Err(Error::Precondition(PreconditionError::InvalidGrid))
    ));
    assert!(matches!(
        solver.solve_on_grid(&[0.0, f64::NAN]),
        Err(Error::Precondition(PreconditionError::InvalidGrid))
    ));

    // Failed preconditions do not lock the initial condition.
    solver.set_initial_condition(2.0).unwrap();
}

#[test]
fn derivative_must_match_initial_condition() {
    let mut solver = FixedStep::new(growth, methods::rk4());
    solver.set_initial_condition([1.0, 2.0]).unwrap();

    let err = solver.solve((0.0, 1.0), 10).unwrap_err();
    assert!(matches!(
        err,
        Error::Precondition(PreconditionError::DimensionMismatch {
            expected: 2,
            found: 1
        })
    ));
}

#[test]
fn initial_condition_is_locked_after_a_solve() {
    let mut solver = FixedStep::new(growth, methods::rk4());
    solver.set_initial_condition(1.0).unwrap();
    solver.solve((0.0, 1.0), 10).unwrap();

    assert_eq!(
        solver.set_initial_condition(2.0),
        Err(PreconditionError::InitialConditionLocked)
    );

    // Solving again reuses the same initial condition.
    let again = solver.solve((0.0, 1.0), 10).unwrap();
    assert_eq!(again.trajectory.values()[0], vec![1.0]);
}

#[test]
fn shape_change_mid_solve_is_an_error() {
    let system = |t: f64, u: &[f64]| if t > 0.5 { Vec::new() } else { vec![u[0]] };
    let mut solver = FixedStep::new(system, methods::forward_euler());
    solver.set_initial_condition(1.0).unwrap();

    let err = solver.solve((0.0, 1.0), 4).unwrap_err();
    match err {
        Error::Dimension { step, source } => {
            assert_eq!(step, 4);
            assert_eq!(
                source,
                DimensionError {
                    expected: 1,
                    found: 0
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn stage_solve_failure_is_fatal() {
    let stepper = CoupledImplicitRk::with_solver(ButcherTableau::backward_euler(), GivesUp);
    let mut solver = FixedStep::new(growth, stepper);
    solver.set_initial_condition(1.0).unwrap();

    let err = solver.solve((0.0, 1.0), 10).unwrap_err();
    match err {
        Error::StageSolve {
            step,
            t,
            u,
            failure,
        } => {
            assert_eq!(step, 1);
            assert_eq!(t, 0.0);
            assert_eq!(u, vec![1.0]);
            assert_eq!(failure.status, SolveStatus::MaxIters);
        }
        other => panic!("unexpected error: {other}"),
    }

    // A failed solve leaves the initial condition unlocked.
    assert!(solver.set_initial_condition(0.5).is_ok());
}

#[test]
fn backward_euler_on_stiff_decay_stays_bounded() {
    // u' = −1000·(u − cos t): explicit methods blow up at this step size.
    let system = |t: f64, u: &[f64]| vec![-1000.0 * (u[0] - t.cos())];
    let mut solver = FixedStep::new(system, methods::backward_euler());
    solver.set_initial_condition(0.0).unwrap();

    let solution = solver.solve((0.0, 1.0), 20).unwrap();
    let (_, u) = solution.trajectory.last().unwrap();
    assert_relative_eq!(u[0], 1.0_f64.cos(), epsilon = 1e-2);
}
