use runge_core::DimensionError;

use crate::integrate::PreconditionError;

/// Errors that can occur during adaptive integration.
///
/// Stage-solve failures are not errors here: they produce a non-finite error
/// estimate, which shrinks the step to `min_dt`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// The system changed its output length during the solve.
    #[error("derivative has the wrong length on the step from t = {t}")]
    Dimension {
        t: f64,
        #[source]
        source: DimensionError,
    },

    /// An accepted step did not advance `t` in floating point.
    #[error("step size {dt:e} no longer advances t = {t}")]
    StepSizeUnderflow { t: f64, dt: f64 },
}
