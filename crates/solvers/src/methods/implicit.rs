use log::warn;
use runge_core::{ButcherTableau, DimensionError, OdeSystem, Rhs, State};

use crate::equation::{Newton, StageSolver};

use super::{Advance, StageFailure, Stepper, stages};

/// Fully implicit Runge-Kutta: all stages are solved together.
///
/// The unknowns are the stacked stage derivatives `K = [k_1, …, k_s]`, and the
/// residual for stage `i` is
///
/// ```text
/// k_i − f(t + c_i·dt, u + dt·Σ_j a_ij·k_j)
/// ```
///
/// giving one system of `s·neq` equations per step. The initial guess repeats
/// `f(t, u)` for every stage.
///
/// Any tableau works, including explicit and diagonally implicit ones, at the
/// cost of a larger solve.
#[derive(Debug, Clone)]
pub struct CoupledImplicitRk<N> {
    tableau: ButcherTableau,
    solver: N,
}

impl CoupledImplicitRk<Newton> {
    /// Creates a coupled strategy with the default Newton solver.
    #[must_use]
    pub fn new(tableau: ButcherTableau) -> Self {
        Self::with_solver(tableau, Newton::default())
    }
}

impl<N: StageSolver> CoupledImplicitRk<N> {
    /// Creates a coupled strategy with a custom stage solver.
    #[must_use]
    pub fn with_solver(tableau: ButcherTableau, solver: N) -> Self {
        Self { tableau, solver }
    }

    /// Returns the stage solver.
    #[must_use]
    pub fn solver(&self) -> &N {
        &self.solver
    }
}

impl<N: StageSolver> Stepper for CoupledImplicitRk<N> {
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

        let guess = rhs.eval_vec(t, u)?.repeat(s);

        let mut stage_u = vec![0.0; neq];
        let mut f = vec![0.0; neq];
        let residual = |k: &[f64], r: &mut [f64]| -> Result<(), DimensionError> {
            for (i, (ri, ki)) in r.chunks_exact_mut(neq).zip(k.chunks_exact(neq)).enumerate() {
                let terms = a.row(i).into_iter().copied().zip(k.chunks_exact(neq));
                stages::combine_into(u, dt, terms, &mut stage_u);
                rhs.eval(t + c[i] * dt, &stage_u, &mut f)?;
                for ((res, kij), fij) in ri.iter_mut().zip(ki).zip(&f) {
                    *res = kij - fij;
                }
            }
            Ok(())
        };

        let solution = self.solver.solve(residual, &guess)?;
        let failure = (!solution.is_converged()).then(|| {
            warn!(
                "coupled stage solve at t = {t} failed: {:?} after {} iterations",
                solution.status, solution.iters
            );
            StageFailure::from_solution(None, &solution)
        });

        let k = solution.x.chunks_exact(neq);
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
