use thiserror::Error;

/// Configuration for the adaptive integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    tol: f64,
    max_dt: f64,
    min_dt: f64,
    eta: f64,
}

/// Errors that can occur when validating an adaptive integrator config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tol must be finite and positive")]
    Tol,

    #[error("min_dt must be finite and positive")]
    MinDt,

    #[error("max_dt must be at least min_dt")]
    MaxDt,

    #[error("eta must lie strictly between 0 and 1")]
    Eta,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-3, f64::INFINITY, 1e-5).unwrap()
    }
}

impl Config {
    /// Creates a new config with a safety factor of 0.9.
    ///
    /// `max_dt` may be infinite.
    ///
    /// # Errors
    ///
    /// Returns an error if `tol` or `min_dt` is not finite and positive, or if
    /// `max_dt` is NaN or smaller than `min_dt`.
    pub fn new(tol: f64, max_dt: f64, min_dt: f64) -> Result<Self, ConfigError> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(ConfigError::Tol);
        }
        if !min_dt.is_finite() || min_dt <= 0.0 {
            return Err(ConfigError::MinDt);
        }
        if max_dt.is_nan() || max_dt < min_dt {
            return Err(ConfigError::MaxDt);
        }

        Ok(Self {
            tol,
            max_dt,
            min_dt,
            eta: 0.9,
        })
    }

    /// Sets the safety factor applied to every proposed step.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < eta < 1`.
    pub fn with_eta(mut self, eta: f64) -> Result<Self, ConfigError> {
        if !(eta > 0.0 && eta < 1.0) {
            return Err(ConfigError::Eta);
        }
        self.eta = eta;
        Ok(self)
    }

    /// Returns the local error tolerance.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Returns the largest step the controller will propose.
    #[must_use]
    pub fn max_dt(&self) -> f64 {
        self.max_dt
    }

    /// Returns the smallest step the controller will propose.
    ///
    /// Steps at or below this size are accepted regardless of their error.
    #[must_use]
    pub fn min_dt(&self) -> f64 {
        self.min_dt
    }

    /// Returns the safety factor.
    #[must_use]
    pub fn eta(&self) -> f64 {
        self.eta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.tol(), 1e-3);
        assert_eq!(config.max_dt(), f64::INFINITY);
        assert_eq!(config.min_dt(), 1e-5);
        assert_eq!(config.eta(), 0.9);
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(Config::new(0.0, 1.0, 0.1), Err(ConfigError::Tol));
        assert_eq!(Config::new(f64::NAN, 1.0, 0.1), Err(ConfigError::Tol));
        assert_eq!(Config::new(1e-3, 1.0, 0.0), Err(ConfigError::MinDt));
        assert_eq!(Config::new(1e-3, 0.01, 0.1), Err(ConfigError::MaxDt));
        assert_eq!(Config::new(1e-3, f64::NAN, 0.1), Err(ConfigError::MaxDt));
        assert_eq!(Config::default().with_eta(1.0), Err(ConfigError::Eta));
        assert_eq!(Config::default().with_eta(f64::NAN), Err(ConfigError::Eta));
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let config = Config::new(1e-6, 0.1, 0.1).unwrap().with_eta(0.8).unwrap();
        assert_eq!(config.max_dt(), config.min_dt());
        assert_eq!(config.eta(), 0.8);
    }
}
