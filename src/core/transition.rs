//! Transition records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A transition between states of the chart.
///
/// - `target: None` marks an *internal* transition: no state is entered or
///   exited, only the action (if any) runs.
/// - `event: None` marks an *eventless* transition, evaluated before any
///   queued event on every macro-step.
/// - `guard` and `action` are opaque code strings for the
///   [`Evaluator`](crate::evaluator::Evaluator).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Source state; the transition is only considered while this state is
    /// active.
    pub source: String,
    /// Target state, or `None` for an internal transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Triggering event name, or `None` for an eventless transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Guard code evaluated against the triggering event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
    /// Action code executed between exit and entry actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Transition {
    /// Whether this transition changes no state.
    pub fn is_internal(&self) -> bool {
        self.target.is_none()
    }

    /// Whether this transition fires without an event.
    pub fn is_eventless(&self) -> bool {
        self.event.is_none()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(target) = &self.target {
            write!(f, " -> {target}")?;
        }
        if let Some(event) = &self.event {
            write!(f, " on {event}")?;
        }
        if let Some(guard) = &self.guard {
            write!(f, " [{guard}]")?;
        }
        Ok(())
    }
}
