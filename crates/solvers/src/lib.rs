//! Runge-Kutta integrators for the Runge framework.
//!
//! # Modules
//!
//! - [`methods`] — stepping strategies driven by a [`ButcherTableau`]:
//!   explicit, fully coupled implicit, and sequential (SDIRK/ESDIRK)
//! - [`integrate`] — the fixed-step and adaptive time-stepping cores that
//!   drive a strategy from `t0` to `T`
//! - [`equation`] — the nonlinear stage solver contract used by implicit
//!   strategies, with a Newton implementation
//!
//! # Example
//!
//! ```
//! use runge_solvers::{integrate::fixed::FixedStep, methods};
//!
//! let mut solver = FixedStep::new(|_t: f64, u: &[f64]| vec![u[0]], methods::rk4());
//! solver.set_initial_condition(1.0).unwrap();
//!
//! let solution = solver.solve((0.0, 1.0), 100).unwrap();
//! let (t, u) = solution.trajectory.last().unwrap();
//!
//! assert_eq!(t, 1.0);
//! assert!((u[0] - 1.0_f64.exp()).abs() < 1e-8);
//! ```
//!
//! [`ButcherTableau`]: runge_core::ButcherTableau

pub mod equation;
pub mod integrate;
pub mod methods;
