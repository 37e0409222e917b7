//! Builder for transition records.

use crate::core::Transition;

/// Builder for constructing transitions with a fluent API.
///
/// Only the source state is required; omitting `.to()` yields an internal
/// transition and omitting `.on()` yields an eventless one.
///
/// # Example
///
/// ```rust
/// use strata::TransitionBuilder;
///
/// let transition = TransitionBuilder::from("idle")
///     .to("busy")
///     .on("work")
///     .guard("has_capacity")
///     .action("log_start")
///     .build();
///
/// assert_eq!(transition.source, "idle");
/// assert_eq!(transition.target.as_deref(), Some("busy"));
/// ```
pub struct TransitionBuilder {
    source: String,
    target: Option<String>,
    event: Option<String>,
    guard: Option<String>,
    action: Option<String>,
}

impl TransitionBuilder {
    /// Start a transition from the given source state.
    pub fn from(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
            event: None,
            guard: None,
            action: None,
        }
    }

    /// Set the target state. Without a target the transition is internal.
    pub fn to(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the triggering event name. Without one the transition is
    /// eventless and considered on every macro-step.
    pub fn on(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the guard code evaluated against the triggering event.
    pub fn guard(mut self, code: impl Into<String>) -> Self {
        self.guard = Some(code.into());
        self
    }

    /// Set the action code executed when the transition fires.
    pub fn action(mut self, code: impl Into<String>) -> Self {
        self.action = Some(code.into());
        self
    }

    /// Build the transition record.
    pub fn build(self) -> Transition {
        Transition {
            source: self.source,
            target: self.target,
            event: self.event,
            guard: self.guard,
            action: self.action,
        }
    }
}
