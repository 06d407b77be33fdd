//! Stage arithmetic shared by all strategies.

use ndarray::Array1;

/// Writes `u + dt·Σ w·k` into `out`, skipping zero weights.
pub(super) fn combine_into<'a, I>(u: &[f64], dt: f64, terms: I, out: &mut [f64])
where
    I: IntoIterator<Item = (f64, &'a [f64])>,
{
    out.copy_from_slice(u);
    for (w, k) in terms {
        if w == 0.0 {
            continue;
        }
        let scale = dt * w;
        for (o, ki) in out.iter_mut().zip(k) {
            *o += scale * ki;
        }
    }
}

/// Returns `u + dt·Σ_i weights_i·k_i`.
pub(super) fn update<'a, I>(u: &[f64], dt: f64, weights: &Array1<f64>, stages: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut out = vec![0.0; u.len()];
    combine_into(u, dt, weights.iter().copied().zip(stages), &mut out);
    out
}

/// Returns the Euclidean norm of `dt·Σ_i e_i·k_i`.
pub(super) fn error_norm<'a, I>(dt: f64, e: &Array1<f64>, stages: I, neq: usize) -> f64
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let zero = vec![0.0; neq];
    update(&zero, dt, e, stages)
        .iter()
        .map(|v| v * v)
        .sum::<f64>()
        .sqrt()
}
