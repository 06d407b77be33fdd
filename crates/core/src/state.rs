/// The integrator's position within a single solve.
///
/// A `State` is created by an integrator when `solve` starts, handed to the
/// stepping strategy by reference for each step, and dropped when the solve
/// returns. Nothing in it is shared across solves.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Current time `t_n`.
    pub t: f64,

    /// Current solution `u_n`.
    pub u: Vec<f64>,

    /// Size of the next step to attempt.
    pub dt: f64,

    /// Number of accepted steps so far.
    pub n: usize,
}

impl State {
    /// Creates a state at `(t, u)` with no steps taken and a zero step size.
    #[must_use]
    pub fn new(t: f64, u: Vec<f64>) -> Self {
        Self { t, u, dt: 0.0, n: 0 }
    }

    /// Returns the number of equations.
    #[must_use]
    pub fn neq(&self) -> usize {
        self.u.len()
    }
}
