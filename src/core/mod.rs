//! Core statechart types.
//!
//! This module contains the value types the interpreter operates on:
//! - State variants and the validated [`Statechart`] tree
//! - [`Transition`] and [`Event`] records
//! - [`MicroStep`] / [`MacroStep`] audit records
//!
//! Everything here is plain immutable data; the execution semantics live in
//! [`crate::interpreter`].

mod chart;
mod event;
mod state;
mod step;
mod transition;

pub use chart::Statechart;
pub use event::Event;
pub use state::State;
pub use step::{MacroStep, MicroStep};
pub use transition::Transition;
