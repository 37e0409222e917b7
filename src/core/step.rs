//! Micro-step and macro-step value records.
//!
//! Order in the entered/exited lists is significant: exited states are
//! deepest-first, entered states shallowest-first. Steps are immutable once
//! produced and exist for execution and auditing only.

use super::{Event, Transition};
use serde::{Deserialize, Serialize};

/// One atomic configuration change.
///
/// A micro-step records the event consumed (if any), the transition fired
/// (if any), and the ordered lists of entered and exited state names.
/// Stabilization steps and the synthetic startup step carry no transition;
/// a no-op step for an unmatched event carries only the event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MicroStep {
    /// Event consumed by this step, if any.
    pub event: Option<Event>,
    /// Transition fired by this step, if any.
    pub transition: Option<Transition>,
    /// Entered state names, shallowest first.
    pub entered_states: Vec<String>,
    /// Exited state names, deepest first.
    pub exited_states: Vec<String>,
}

impl MicroStep {
    pub(crate) fn new(
        event: Option<Event>,
        transition: Option<Transition>,
        entered_states: Vec<String>,
        exited_states: Vec<String>,
    ) -> Self {
        Self {
            event,
            transition,
            entered_states,
            exited_states,
        }
    }
}

/// One externally visible "tick" of the interpreter: the micro-steps of the
/// fired transitions followed by all stabilization micro-steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacroStep {
    /// Micro-steps in application order.
    pub steps: Vec<MicroStep>,
}

impl MacroStep {
    pub(crate) fn new(steps: Vec<MicroStep>) -> Self {
        Self { steps }
    }

    /// The event consumed by this macro-step, if any.
    pub fn event(&self) -> Option<&Event> {
        self.steps.first().and_then(|step| step.event.as_ref())
    }

    /// Transitions fired during this macro-step, in firing order.
    pub fn transitions(&self) -> Vec<&Transition> {
        self.steps
            .iter()
            .filter_map(|step| step.transition.as_ref())
            .collect()
    }

    /// All state names entered during this macro-step, in entry order.
    pub fn entered_states(&self) -> Vec<&str> {
        self.steps
            .iter()
            .flat_map(|step| step.entered_states.iter().map(String::as_str))
            .collect()
    }

    /// All state names exited during this macro-step, in exit order.
    pub fn exited_states(&self) -> Vec<&str> {
        self.steps
            .iter()
            .flat_map(|step| step.exited_states.iter().map(String::as_str))
            .collect()
    }
}
