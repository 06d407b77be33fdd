//! Step-size control.

use super::Config;

/// Proposes the next step size from the error of a step of size `dt`.
///
/// The classical controller `η·(tol/err)^(1/(p+1))·dt`, clamped to
/// `[min_dt, max_dt]`. A non-finite error proposes `min_dt`; a zero error
/// proposes `max_dt`.
pub(super) fn propose(dt: f64, error: f64, order: u32, config: &Config) -> f64 {
    if !error.is_finite() {
        return config.min_dt();
    }

    let exponent = 1.0 / f64::from(order + 1);
    let factor = config.eta() * (config.tol() / error).powf(exponent);
    let proposed = factor * dt;

    if proposed.is_nan() {
        config.min_dt()
    } else {
        proposed.clamp(config.min_dt(), config.max_dt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn classical_formula_inside_bounds() {
        let config = Config::new(1e-4, 10.0, 1e-8).unwrap();
        let dt = propose(0.1, 1e-2, 4, &config);
        assert_relative_eq!(dt, 0.9 * (1e-2_f64).powf(0.2) * 0.1, epsilon = 1e-15);
    }

    #[test]
    fn small_error_grows_step() {
        let config = Config::new(1e-3, 10.0, 1e-8).unwrap();
        assert!(propose(0.1, 1e-6, 2, &config) > 0.1);
    }

    #[test]
    fn clamps_to_bounds() {
        let config = Config::new(1e-3, 0.5, 0.01).unwrap();
        assert_eq!(propose(0.1, 1e3, 1, &config), 0.01);
        assert_eq!(propose(0.1, 1e-20, 1, &config), 0.5);
    }

    #[test]
    fn zero_error_proposes_max_dt() {
        let bounded = Config::new(1e-3, 0.5, 0.01).unwrap();
        assert_eq!(propose(0.1, 0.0, 4, &bounded), 0.5);
        assert_eq!(propose(0.1, 0.0, 4, &Config::default()), f64::INFINITY);
    }

    #[test]
    fn non_finite_error_proposes_min_dt() {
        let config = Config::default();
        assert_eq!(propose(0.1, f64::NAN, 2, &config), 1e-5);
        assert_eq!(propose(0.1, f64::INFINITY, 2, &config), 1e-5);
    }
}
