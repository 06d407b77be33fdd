/// Event emitted by the fixed-step integrator for each grid point.
///
/// Step 0 is the initial condition before any integration.
/// Steps 1..N are emitted after each step.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The step number (0 for the initial condition).
    pub step: usize,

    /// Time of this grid point.
    pub t: f64,

    /// Size of the step that reached `t`, `None` for step 0.
    pub dt: Option<f64>,

    /// Solution at `t`.
    pub u: Vec<f64>,
}
