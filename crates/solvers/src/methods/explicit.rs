use runge_core::{ButcherTableau, DimensionError, OdeSystem, Rhs, State, TableauError};

use super::{Advance, Stepper, stages};

/// Explicit Runge-Kutta: stages are evaluated in order, each from the ones
/// before it.
///
/// For stage `i`, `k_i = f(t + c_i·dt, u + dt·Σ_{j<i} a_ij·k_j)`, and the step
/// result is `u + dt·Σ b_i·k_i`.
#[derive(Debug, Clone)]
pub struct ExplicitRk {
    tableau: ButcherTableau,
    k: Vec<Vec<f64>>,
    stage_u: Vec<f64>,
}

impl ExplicitRk {
    /// Creates an explicit strategy from a tableau.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::NotExplicit`] if `a` is not strictly
    /// lower-triangular.
    pub fn new(tableau: ButcherTableau) -> Result<Self, TableauError> {
        if !tableau.is_explicit() {
            return Err(TableauError::NotExplicit);
        }
        Ok(Self {
            tableau,
            k: Vec::new(),
            stage_u: Vec::new(),
        })
    }
}

impl Stepper for ExplicitRk {
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
        let dt = state.dt;
        let a = self.tableau.a();
        let c = self.tableau.c();

        self.k.resize_with(s, Vec::new);
        for k in &mut self.k {
            k.resize(neq, 0.0);
        }
        self.stage_u.resize(neq, 0.0);

        for i in 0..s {
            let (done, rest) = self.k.split_at_mut(i);
            let terms = done.iter().enumerate().map(|(j, kj)| (a[[i, j]], kj.as_slice()));
            stages::combine_into(&state.u, dt, terms, &mut self.stage_u);
            rhs.eval(state.t + c[i] * dt, &self.stage_u, &mut rest[0])?;
        }

        let u = stages::update(&state.u, dt, self.tableau.b(), self.k.iter().map(Vec::as_slice));
        let error = self
            .tableau
            .e()
            .map(|e| stages::error_norm(dt, e, self.k.iter().map(Vec::as_slice), neq));

        Ok(Advance {
            u,
            error,
            failure: None,
        })
    }
}
