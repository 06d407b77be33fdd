use runge_core::DimensionError;

use crate::{integrate::PreconditionError, methods::StageFailure};

/// Errors that can occur during fixed-step integration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// A nonlinear stage solve did not converge.
    ///
    /// `t` and `u` describe the state the failing step started from.
    #[error("stage solve failed on step {step} starting at t = {t}")]
    StageSolve {
        step: usize,
        t: f64,
        u: Vec<f64>,
        #[source]
        failure: StageFailure,
    },

    /// The system changed its output length during the solve.
    #[error("derivative has the wrong length on step {step}")]
    Dimension {
        step: usize,
        #[source]
        source: DimensionError,
    },
}
