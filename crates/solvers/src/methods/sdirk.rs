use log::warn;
use runge_core::{ButcherTableau, DimensionError, OdeSystem, Rhs, State, TableauError};

use crate::equation::{Newton, StageSolver};

use super::{Advance, StageFailure, Stepper, stages};

/// Diagonally implicit Runge-Kutta (SDIRK/ESDIRK): stages are solved one at a
/// time.
///
/// Because `a` is lower-triangular, stage `i` depends only on itself and the
/// stages before it. Each stage is a system of `neq` equations,
///
/// ```text
/// k_i − f(t + c_i·dt, u + dt·Σ_{j<i} a_ij·k_j + dt·γ·k_i) = 0
/// ```
///
/// solved with the previous stage as the initial guess (`f(t, u)` for the first
/// solved stage). When the first row of `a` is zero the first stage is simply
/// `f(t, u)` and needs no solve.
///
/// If a stage solve fails its last iterate stands in for the stage and the
/// remaining stages are still solved. The first failure is reported.
#[derive(Debug, Clone)]
pub struct SequentialImplicitRk<N> {
    tableau: ButcherTableau,
    gamma: f64,
    solver: N,
    k: Vec<Vec<f64>>,
}

impl SequentialImplicitRk<Newton> {
    /// Creates a sequential strategy with the default Newton solver.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::NotDiagonallyImplicit`] if the tableau is not
    /// lower-triangular with a shared diagonal.
    pub fn new(tableau: ButcherTableau) -> Result<Self, TableauError> {
        Self::with_solver(tableau, Newton::default())
    }
}

impl<N: StageSolver> SequentialImplicitRk<N> {
    /// Creates a sequential strategy with a custom stage solver.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::NotDiagonallyImplicit`] if the tableau is not
    /// lower-triangular with a shared diagonal.
    pub fn with_solver(tableau: ButcherTableau, solver: N) -> Result<Self, TableauError> {
        let gamma = tableau
            .diagonal()
            .ok_or(TableauError::NotDiagonallyImplicit)?;
        Ok(Self {
            tableau,
            gamma,
            solver,
            k: Vec::new(),
        })
    }

    /// Returns the shared diagonal coefficient `γ`.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Returns the stage solver.
    #[must_use]
    pub fn solver(&self) -> &N {
        &self.solver
    }
}

impl<N: StageSolver> Stepper for SequentialImplicitRk<N> {
    fn tableau(&self) -> &ButcherTableau {
        &self.tableau
    }

    fn advance<S: OdeSystem>(
        &mut self,
        rhs: &Rhs<'_, S>,
        state: &State,
    ) -> Result<Advance, DimensionError> {
        let neq = state.neq();
        let s = self.tableau.stages();
        let (t, u, dt) = (state.t, state.u.as_slice(), state.dt);
        let a = self.tableau.a();
        let c = self.tableau.c();
        let gamma = self.gamma;
        let explicit_first = self.tableau.has_explicit_first_stage();

        self.k.resize_with(s, Vec::new);
        for k in &mut self.k {
            k.resize(neq, 0.0);
        }

        let f0 = rhs.eval_vec(t, u)?;
        let mut failure = None;
        let mut known = vec![0.0; neq];
        let mut stage_u = vec![0.0; neq];

        for i in 0..s {
            let (done, rest) = self.k.split_at_mut(i);
            if i == 0 && explicit_first {
                rest[0].copy_from_slice(&f0);
                continue;
            }

            let terms = done.iter().enumerate().map(|(j, kj)| (a[[i, j]], kj.as_slice()));
            stages::combine_into(u, dt, terms, &mut known);

            let ti = t + c[i] * dt;
            let residual = |x: &[f64], r: &mut [f64]| -> Result<(), DimensionError> {
                stages::combine_into(&known, dt, [(gamma, x)], &mut stage_u);
                rhs.eval(ti, &stage_u, r)?;
                for (ri, xi) in r.iter_mut().zip(x) {
                    *ri = xi - *ri;
                }
                Ok(())
            };

            let guess = done.last().unwrap_or(&f0);
            let solution = self.solver.solve(residual, guess)?;
            if !solution.is_converged() {
                warn!(
                    "stage {i} solve at t = {t} failed: {:?} after {} iterations",
                    solution.status, solution.iters
                );
                failure.get_or_insert_with(|| StageFailure::from_solution(Some(i), &solution));
            }
            rest[0].copy_from_slice(&solution.x);
        }

        let k = self.k.iter().map(Vec::as_slice);
        let u_next = stages::update(u, dt, self.tableau.b(), k.clone());
        let error = self.tableau.e().map(|e| {
            if failure.is_some() {
                f64::NAN
            } else {
                stages::error_norm(dt, e, k, neq)
            }
        });

        Ok(Advance {
            u: u_next,
            error,
            failure,
        })
    }
}
