//! Core traits and types for the Runge framework.
//!
//! This crate defines the shared abstractions that integrators, stepping
//! strategies, and observers build on:
//!
//! - [`OdeSystem`] — a right-hand side `f(t, u)` of an ODE `u' = f(t, u)`
//! - [`Rhs`] — the adapter integrators call through, which pins the number of
//!   equations and rejects derivatives of the wrong length
//! - [`InitialCondition`] — a scalar or vector starting value
//! - [`ButcherTableau`] — the coefficients that define a Runge-Kutta method
//! - [`State`] and [`Trajectory`] — the integrator's position within a solve
//!   and the accumulated solution
//! - [`Observer`] — receives solver events and optionally returns control actions

mod initial;
mod observer;
mod state;
mod trajectory;

pub mod rhs;
pub mod tableau;

pub use initial::InitialCondition;
pub use observer::Observer;
pub use rhs::{DimensionError, OdeSystem, Rhs, Scalar};
pub use state::State;
pub use tableau::{ButcherTableau, TableauError};
pub use trajectory::Trajectory;
