//! Newton's method for stage equations.
//!
//! # Algorithm
//!
//! Starting from the guess `x`, each iteration:
//!
//! 1. Builds the Jacobian of the residual by forward differences, one column
//!    per unknown, with step `fd_step · max(|x_j|, 1)`.
//! 2. Solves `J δ = −r(x)` by LU with partial pivoting.
//! 3. Updates `x ← x + δ` and re-evaluates the residual.
//!
//! The solve converges when `‖r(x)‖∞ ≤ residual_tol`, or when an update is
//! small relative to the iterate: `‖δ‖∞ ≤ step_tol · (1 + ‖x‖∞)`.
//!
//! It stops without converging when the iteration limit is reached, the
//! Jacobian is singular, or the residual becomes non-finite. In every case the
//! last iterate is returned so callers can decide what to do with it.

mod config;

pub use config::{Config, ConfigError};

use log::trace;
use ndarray::Array2;

use super::{StageSolution, StageSolver, Status, linear, max_norm};

/// Newton stage solver holding its configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Newton {
    config: Config,
}

impl Newton {
    /// Creates a Newton solver with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the solver configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl StageSolver for Newton {
    fn solve<R, E>(&mut self, residual: R, guess: &[f64]) -> Result<StageSolution, E>
    where
        R: FnMut(&[f64], &mut [f64]) -> Result<(), E>,
    {
        solve(residual, guess, &self.config)
    }
}

/// Solves `residual(x) = 0` with Newton's method starting from `guess`.
///
/// # Errors
///
/// Returns the residual's error if any evaluation fails. Non-convergence is
/// reported through the returned [`StageSolution::status`].
pub fn solve<R, E>(mut residual: R, guess: &[f64], config: &Config) -> Result<StageSolution, E>
where
    R: FnMut(&[f64], &mut [f64]) -> Result<(), E>,
{
    let n = guess.len();
    let mut x = guess.to_vec();
    let mut r = vec![0.0; n];
    let mut r_shifted = vec![0.0; n];
    let mut jacobian = Array2::<f64>::zeros((n, n));

    residual(&x, &mut r)?;
    let mut norm = max_norm(&r);

    for iter in 0..config.max_iters() {
        if !norm.is_finite() {
            return Ok(finish(x, Status::NonFinite, norm, iter));
        }
        if norm <= config.residual_tol() {
            return Ok(finish(x, Status::Converged, norm, iter));
        }

        for j in 0..n {
            let original = x[j];
            let shifted = original + config.fd_step() * original.abs().max(1.0);
            let h = shifted - original;
            x[j] = shifted;
            residual(&x, &mut r_shifted)?;
            x[j] = original;

            for i in 0..n {
                jacobian[[i, j]] = (r_shifted[i] - r[i]) / h;
            }
        }

        let neg_r = r.iter().map(|v| -v).collect();
        let Some(delta) = linear::lu_solve(jacobian.clone(), neg_r) else {
            trace!("newton: singular jacobian at iteration {iter}");
            return Ok(finish(x, Status::SingularJacobian, norm, iter));
        };

        for (xi, di) in x.iter_mut().zip(&delta) {
            *xi += di;
        }
        residual(&x, &mut r)?;
        norm = max_norm(&r);

        let step = max_norm(&delta);
        trace!("newton: iteration {}, |r| = {norm:e}, |dx| = {step:e}", iter + 1);

        if norm.is_finite()
            && (norm <= config.residual_tol() || step <= config.step_tol() * (1.0 + max_norm(&x)))
        {
            return Ok(finish(x, Status::Converged, norm, iter + 1));
        }
    }

    let status = if !norm.is_finite() {
        Status::NonFinite
    } else if norm <= config.residual_tol() {
        Status::Converged
    } else {
        Status::MaxIters
    };
    Ok(finish(x, status, norm, config.max_iters()))
}

fn finish(x: Vec<f64>, status: Status, residual_norm: f64, iters: usize) -> StageSolution {
    StageSolution {
        status,
        x,
        residual_norm,
        iters,
    }
}
