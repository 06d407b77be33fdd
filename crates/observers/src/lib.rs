//! Reusable observers for the Runge framework.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the fixed-step and adaptive integrators.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for cross-solver observers
//!   ([`HasTime`], [`HasStepSize`], [`HasProposedStep`], [`HasAcceptance`],
//!   [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`StepRecorder`] — records accepted steps and proposed step sizes
//! - [`StopAfter`] — stops an integration once a given time is reached
//! - [`LogObserver`] — reports progress through the `log` facade
//!
//! [`Observer`]: runge_core::Observer
//! [`HasTime`]: traits::HasTime
//! [`HasStepSize`]: traits::HasStepSize
//! [`HasProposedStep`]: traits::HasProposedStep
//! [`HasAcceptance`]: traits::HasAcceptance
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod log_observer;
mod recorder;
mod stop;

pub use log_observer::LogObserver;
pub use recorder::StepRecorder;
pub use stop::StopAfter;
