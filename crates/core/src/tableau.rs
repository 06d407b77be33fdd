//! Butcher tableaus for Runge-Kutta methods.
//!
//! A tableau is the complete definition of a Runge-Kutta method:
//!
//! ```text
//!  c | a
//! ---+----
//!    | b
//!    | e      (embedded pairs only)
//! ```
//!
//! Stage `i` evaluates `k_i = f(t_n + c_i·dt, u_n + dt·Σ_j a_ij·k_j)` and the
//! step update is `u_{n+1} = u_n + dt·Σ_i b_i·k_i`. Embedded pairs also carry
//! error weights `e = b − b̂`, where `b̂` are the weights of a second formula of
//! different order, so that `dt·Σ_i e_i·k_i` estimates the local error.
//!
//! Tableaus are validated on construction and immutable afterwards. Named
//! constructors cover every method the integrators ship with; adding a method
//! means supplying coefficients, not code.

use ndarray::{Array1, Array2, array};
use thiserror::Error;

/// Errors that can occur when building a tableau or using it with a strategy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableauError {
    #[error("tableau must have at least one stage")]
    Empty,

    #[error("`a` must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("`{name}` has length {len}, expected {stages}")]
    Length {
        name: &'static str,
        len: usize,
        stages: usize,
    },

    #[error("tableau coefficients must be finite")]
    NonFinite,

    #[error("order must be at least 1")]
    ZeroOrder,

    #[error("tableau is not explicit: `a` must be strictly lower-triangular")]
    NotExplicit,

    #[error("tableau is not diagonally implicit: `a` must be lower-triangular with a constant diagonal")]
    NotDiagonallyImplicit,
}

/// Coefficients of a Runge-Kutta method.
#[derive(Debug, Clone, PartialEq)]
pub struct ButcherTableau {
    a: Array2<f64>,
    b: Array1<f64>,
    c: Array1<f64>,
    e: Option<Array1<f64>>,
    order: u32,
}

impl ButcherTableau {
    /// Creates a tableau from its coefficients and nominal order.
    ///
    /// # Errors
    ///
    /// Returns an error if `a` is not square, `b` or `c` do not have one entry
    /// per stage, any coefficient is non-finite, or `order` is zero.
    pub fn new(
        a: Array2<f64>,
        b: Array1<f64>,
        c: Array1<f64>,
        order: u32,
    ) -> Result<Self, TableauError> {
        let (rows, cols) = a.dim();
        if rows == 0 {
            return Err(TableauError::Empty);
        }
        if rows != cols {
            return Err(TableauError::NotSquare { rows, cols });
        }
        check_length("b", &b, rows)?;
        check_length("c", &c, rows)?;
        if !a.iter().chain(&b).chain(&c).all(|v| v.is_finite()) {
            return Err(TableauError::NonFinite);
        }
        if order == 0 {
            return Err(TableauError::ZeroOrder);
        }

        Ok(Self {
            a,
            b,
            c,
            e: None,
            order,
        })
    }

    /// Attaches error weights `e` directly.
    ///
    /// # Errors
    ///
    /// Returns an error if `e` has the wrong length or non-finite entries.
    pub fn with_error_weights(mut self, e: Array1<f64>) -> Result<Self, TableauError> {
        check_length("e", &e, self.stages())?;
        if !e.iter().all(|v| v.is_finite()) {
            return Err(TableauError::NonFinite);
        }
        self.e = Some(e);
        Ok(self)
    }

    /// Attaches the weights `b̂` of an embedded formula, storing `e = b − b̂`.
    ///
    /// # Errors
    ///
    /// Returns an error if `b_hat` has the wrong length or non-finite entries.
    pub fn with_embedded_weights(self, b_hat: Array1<f64>) -> Result<Self, TableauError> {
        check_length("b_hat", &b_hat, self.stages())?;
        let e = &self.b - &b_hat;
        self.with_error_weights(e)
    }

    /// Returns the stage coupling matrix `a`.
    #[must_use]
    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    /// Returns the update weights `b`.
    #[must_use]
    pub fn b(&self) -> &Array1<f64> {
        &self.b
    }

    /// Returns the stage nodes `c`.
    #[must_use]
    pub fn c(&self) -> &Array1<f64> {
        &self.c
    }

    /// Returns the error weights `e`, if this is an embedded pair.
    #[must_use]
    pub fn e(&self) -> Option<&Array1<f64>> {
        self.e.as_ref()
    }

    /// Returns the nominal order of the update formula.
    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stages(&self) -> usize {
        self.b.len()
    }

    /// Returns true if the tableau carries error weights.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.e.is_some()
    }

    /// Returns true if `a` is strictly lower-triangular.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.a
            .indexed_iter()
            .all(|((i, j), &v)| j < i || v == 0.0)
    }

    /// Returns true if the first stage needs no solve (`a_0j = 0` for all `j`).
    #[must_use]
    pub fn has_explicit_first_stage(&self) -> bool {
        self.a.row(0).iter().all(|&v| v == 0.0)
    }

    /// Returns the shared diagonal entry `γ` of an SDIRK or ESDIRK tableau.
    ///
    /// The tableau must be lower-triangular, and every diagonal entry (except
    /// the first, when the first stage is explicit) must equal the same nonzero
    /// `γ`. Returns `None` otherwise.
    #[must_use]
    pub fn diagonal(&self) -> Option<f64> {
        let lower = self.a.indexed_iter().all(|((i, j), &v)| j <= i || v == 0.0);
        if !lower {
            return None;
        }

        let start = usize::from(self.has_explicit_first_stage());
        if start >= self.stages() {
            return None;
        }
        let gamma = self.a[[start, start]];
        if gamma == 0.0 {
            return None;
        }

        (start..self.stages())
            .all(|i| (self.a[[i, i]] - gamma).abs() <= 1e-14 * gamma.abs())
            .then_some(gamma)
    }

    /// Returns true if stages can be solved one at a time (SDIRK or ESDIRK).
    #[must_use]
    pub fn is_diagonally_implicit(&self) -> bool {
        self.diagonal().is_some()
    }
}

/// Named tableaus.
///
/// The coefficients below are known-good, so `unwrap` on construction is safe.
impl ButcherTableau {
    /// Forward Euler: one explicit stage, order 1.
    #[must_use]
    pub fn forward_euler() -> Self {
        Self::new(array![[0.0]], array![1.0], array![0.0], 1).unwrap()
    }

    /// Heun's method: two explicit stages with nodes `(0, 1)`, order 2.
    #[must_use]
    pub fn heun() -> Self {
        Self::new(
            array![[0.0, 0.0], [1.0, 0.0]],
            array![0.5, 0.5],
            array![0.0, 1.0],
            2,
        )
        .unwrap()
    }

    /// Explicit midpoint: two explicit stages with nodes `(0, 1/2)`, order 2.
    #[must_use]
    pub fn explicit_midpoint() -> Self {
        Self::new(
            array![[0.0, 0.0], [0.5, 0.0]],
            array![0.0, 1.0],
            array![0.0, 0.5],
            2,
        )
        .unwrap()
    }

    /// The classical fourth-order Runge-Kutta method.
    #[must_use]
    pub fn rk4() -> Self {
        Self::new(
            array![
                [0.0, 0.0, 0.0, 0.0],
                [0.5, 0.0, 0.0, 0.0],
                [0.0, 0.5, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
            array![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
            array![0.0, 0.5, 0.5, 1.0],
            4,
        )
        .unwrap()
    }

    /// Euler-Heun embedded pair.
    ///
    /// Steps with forward Euler (order 1) and estimates the error against
    /// Heun's method.
    #[must_use]
    pub fn euler_heun() -> Self {
        Self::new(
            array![[0.0, 0.0], [1.0, 0.0]],
            array![1.0, 0.0],
            array![0.0, 1.0],
            1,
        )
        .and_then(|t| t.with_embedded_weights(array![0.5, 0.5]))
        .unwrap()
    }

    /// Runge-Kutta-Fehlberg 4(5) embedded pair.
    ///
    /// Six stages; steps with the fourth-order formula and estimates the error
    /// against the fifth-order one.
    #[must_use]
    pub fn rkf45() -> Self {
        Self::new(
            array![
                [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                [1.0 / 4.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0, 0.0],
                [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0, 0.0],
                [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0, 0.0],
                [
                    -8.0 / 27.0,
                    2.0,
                    -3544.0 / 2565.0,
                    1859.0 / 4104.0,
                    -11.0 / 40.0,
                    0.0
                ],
            ],
            array![
                25.0 / 216.0,
                0.0,
                1408.0 / 2565.0,
                2197.0 / 4104.0,
                -1.0 / 5.0,
                0.0
            ],
            array![0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0],
            4,
        )
        .and_then(|t| {
            t.with_embedded_weights(array![
                16.0 / 135.0,
                0.0,
                6656.0 / 12825.0,
                28561.0 / 56430.0,
                -9.0 / 50.0,
                2.0 / 55.0
            ])
        })
        .unwrap()
    }

    /// Backward Euler: one implicit stage, order 1.
    #[must_use]
    pub fn backward_euler() -> Self {
        Self::new(array![[1.0]], array![1.0], array![1.0], 1).unwrap()
    }

    /// Implicit midpoint: one implicit stage at `c = 1/2`, order 2.
    #[must_use]
    pub fn implicit_midpoint() -> Self {
        Self::new(array![[0.5]], array![1.0], array![0.5], 2).unwrap()
    }

    /// Two-stage Radau IIA, order 3.
    #[must_use]
    pub fn radau2() -> Self {
        Self::new(
            array![[5.0 / 12.0, -1.0 / 12.0], [3.0 / 4.0, 1.0 / 4.0]],
            array![3.0 / 4.0, 1.0 / 4.0],
            array![1.0 / 3.0, 1.0],
            3,
        )
        .unwrap()
    }

    /// Three-stage Radau IIA, order 5.
    #[must_use]
    pub fn radau3() -> Self {
        let sq6 = 6.0_f64.sqrt();
        Self::new(
            array![
                [
                    (88.0 - 7.0 * sq6) / 360.0,
                    (296.0 - 169.0 * sq6) / 1800.0,
                    (-2.0 + 3.0 * sq6) / 225.0
                ],
                [
                    (296.0 + 169.0 * sq6) / 1800.0,
                    (88.0 + 7.0 * sq6) / 360.0,
                    (-2.0 - 3.0 * sq6) / 225.0
                ],
                [(16.0 - sq6) / 36.0, (16.0 + sq6) / 36.0, 1.0 / 9.0],
            ],
            array![(16.0 - sq6) / 36.0, (16.0 + sq6) / 36.0, 1.0 / 9.0],
            array![(4.0 - sq6) / 10.0, (4.0 + sq6) / 10.0, 1.0],
            5,
        )
        .unwrap()
    }

    /// Two-stage, L-stable SDIRK with `γ = (2 − √2)/2`, order 2.
    #[must_use]
    pub fn sdirk2() -> Self {
        let gamma = (2.0 - 2.0_f64.sqrt()) / 2.0;
        Self::new(
            array![[gamma, 0.0], [1.0 - gamma, gamma]],
            array![1.0 - gamma, gamma],
            array![gamma, 1.0],
            2,
        )
        .unwrap()
    }

    /// TR-BDF2 as a three-stage ESDIRK, order 2.
    #[must_use]
    pub fn tr_bdf2() -> Self {
        let (gamma, beta) = tr_bdf2_parameters();
        Self::new(
            array![
                [0.0, 0.0, 0.0],
                [gamma, gamma, 0.0],
                [beta, beta, gamma]
            ],
            array![beta, beta, gamma],
            array![0.0, 2.0 * gamma, 1.0],
            2,
        )
        .unwrap()
    }

    /// TR-BDF2 with an embedded third-order estimate, for adaptive stepping.
    ///
    /// The embedded weights are `b̂ = ((1 − β)/3, (3β + 1)/3, γ/3)`.
    #[must_use]
    pub fn tr_bdf2_embedded() -> Self {
        let (gamma, beta) = tr_bdf2_parameters();
        Self::tr_bdf2()
            .with_embedded_weights(array![
                (1.0 - beta) / 3.0,
                (3.0 * beta + 1.0) / 3.0,
                gamma / 3.0
            ])
            .unwrap()
    }
}

/// Returns `(γ, β)` for TR-BDF2.
fn tr_bdf2_parameters() -> (f64, f64) {
    let sqrt2 = 2.0_f64.sqrt();
    (1.0 - sqrt2 / 2.0, sqrt2 / 4.0)
}

fn check_length(name: &'static str, v: &Array1<f64>, stages: usize) -> Result<(), TableauError> {
    if v.len() == stages {
        Ok(())
    } else {
        Err(TableauError::Length {
            name,
            len: v.len(),
            stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn all_named() -> Vec<(&'static str, ButcherTableau)> {
        vec![
            ("forward_euler", ButcherTableau::forward_euler()),
            ("heun", ButcherTableau::heun()),
            ("explicit_midpoint", ButcherTableau::explicit_midpoint()),
            ("rk4", ButcherTableau::rk4()),
            ("euler_heun", ButcherTableau::euler_heun()),
            ("rkf45", ButcherTableau::rkf45()),
            ("backward_euler", ButcherTableau::backward_euler()),
            ("implicit_midpoint", ButcherTableau::implicit_midpoint()),
            ("radau2", ButcherTableau::radau2()),
            ("radau3", ButcherTableau::radau3()),
            ("sdirk2", ButcherTableau::sdirk2()),
            ("tr_bdf2", ButcherTableau::tr_bdf2()),
            ("tr_bdf2_embedded", ButcherTableau::tr_bdf2_embedded()),
        ]
    }

    #[test]
    fn weights_are_consistent() {
        for (name, tableau) in all_named() {
            assert_relative_eq!(tableau.b().sum(), 1.0, epsilon = 1e-14);
            for i in 0..tableau.stages() {
                let row_sum = tableau.a().row(i).sum();
                assert!(
                    (row_sum - tableau.c()[i]).abs() < 1e-14,
                    "{name}: row {i} sums to {row_sum}, c = {}",
                    tableau.c()[i]
                );
            }
        }
    }

    #[test]
    fn error_weights_sum_to_zero() {
        for (name, tableau) in all_named() {
            if let Some(e) = tableau.e() {
                assert!(e.sum().abs() < 1e-14, "{name}: e sums to {}", e.sum());
            }
        }
    }

    #[test]
    fn classifies_families() {
        assert!(ButcherTableau::rk4().is_explicit());
        assert!(ButcherTableau::rkf45().is_explicit());
        assert!(!ButcherTableau::backward_euler().is_explicit());
        assert!(!ButcherTableau::radau3().is_explicit());

        assert!(ButcherTableau::sdirk2().is_diagonally_implicit());
        assert!(!ButcherTableau::sdirk2().has_explicit_first_stage());
        assert!(ButcherTableau::tr_bdf2().is_diagonally_implicit());
        assert!(ButcherTableau::tr_bdf2().has_explicit_first_stage());
        assert!(ButcherTableau::backward_euler().is_diagonally_implicit());

        assert!(!ButcherTableau::rk4().is_diagonally_implicit());
        assert!(!ButcherTableau::radau2().is_diagonally_implicit());
    }

    #[test]
    fn diagonal_of_tr_bdf2_is_gamma() {
        let gamma = 1.0 - 2.0_f64.sqrt() / 2.0;
        let diagonal = ButcherTableau::tr_bdf2().diagonal().expect("esdirk");
        assert_relative_eq!(diagonal, gamma);
    }

    #[test]
    fn embedded_flags() {
        assert!(ButcherTableau::euler_heun().is_embedded());
        assert!(ButcherTableau::rkf45().is_embedded());
        assert!(ButcherTableau::tr_bdf2_embedded().is_embedded());
        assert!(!ButcherTableau::tr_bdf2().is_embedded());
        assert!(!ButcherTableau::rk4().is_embedded());
    }

    #[test]
    fn embedded_weights_store_difference() {
        let tableau = ButcherTableau::euler_heun();
        let e = tableau.e().expect("embedded");
        assert_relative_eq!(e[0], 0.5);
        assert_relative_eq!(e[1], -0.5);
    }

    #[test]
    fn rejects_malformed_tableaus() {
        let err = ButcherTableau::new(array![[0.0, 1.0]], array![1.0], array![0.0], 1);
        assert_eq!(err, Err(TableauError::NotSquare { rows: 1, cols: 2 }));

        let err = ButcherTableau::new(array![[0.0]], array![0.5, 0.5], array![0.0], 1);
        assert!(matches!(err, Err(TableauError::Length { name: "b", .. })));

        let err = ButcherTableau::new(array![[f64::NAN]], array![1.0], array![0.0], 1);
        assert_eq!(err, Err(TableauError::NonFinite));

        let err = ButcherTableau::new(array![[0.0]], array![1.0], array![0.0], 0);
        assert_eq!(err, Err(TableauError::ZeroOrder));

        let err = ButcherTableau::new(Array2::zeros((0, 0)), Array1::zeros(0), Array1::zeros(0), 1);
        assert_eq!(err, Err(TableauError::Empty));
    }

    #[test]
    fn rejects_wrong_embedded_length() {
        let err = ButcherTableau::rk4().with_embedded_weights(array![1.0]);
        assert!(matches!(err, Err(TableauError::Length { name: "b_hat", .. })));
    }
}
