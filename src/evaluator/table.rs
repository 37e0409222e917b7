//! Closure-registry evaluator.

use super::{EvalError, Evaluator};
use crate::core::Event;
use std::collections::BTreeMap;

type Condition = Box<dyn Fn(Option<&Event>) -> bool + Send + Sync>;
type Action = Box<dyn Fn(Option<&Event>) -> Vec<Event> + Send + Sync>;

/// Evaluator backed by registries of named closures.
///
/// Guard and action code strings are looked up verbatim; referencing an
/// unregistered name is an evaluation error, which the interpreter treats
/// as fatal.
///
/// # Example
///
/// ```rust
/// use strata::{Event, Evaluator, TableEvaluator};
///
/// let mut evaluator = TableEvaluator::new()
///     .condition("always", |_| true)
///     .action("ping", |_| vec![Event::new("pong")]);
///
/// assert!(evaluator.evaluate_condition("always", None).unwrap());
/// let raised = evaluator.execute_action("ping", None).unwrap();
/// assert_eq!(raised, vec![Event::new("pong")]);
/// ```
#[derive(Default)]
pub struct TableEvaluator {
    conditions: BTreeMap<String, Condition>,
    actions: BTreeMap<String, Action>,
}

impl TableEvaluator {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a condition under the given code string.
    pub fn condition<F>(mut self, code: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(Option<&Event>) -> bool + Send + Sync + 'static,
    {
        self.conditions.insert(code.into(), Box::new(predicate));
        self
    }

    /// Register an action under the given code string.
    pub fn action<F>(mut self, code: impl Into<String>, action: F) -> Self
    where
        F: Fn(Option<&Event>) -> Vec<Event> + Send + Sync + 'static,
    {
        self.actions.insert(code.into(), Box::new(action));
        self
    }

    /// Register an action that raises nothing.
    pub fn silent_action<F>(self, code: impl Into<String>, action: F) -> Self
    where
        F: Fn(Option<&Event>) + Send + Sync + 'static,
    {
        self.action(code, move |event| {
            action(event);
            Vec::new()
        })
    }
}

impl Evaluator for TableEvaluator {
    fn evaluate_condition(
        &mut self,
        code: &str,
        event: Option<&Event>,
    ) -> Result<bool, EvalError> {
        match self.conditions.get(code) {
            Some(predicate) => Ok(predicate(event)),
            None => Err(EvalError::UnknownCondition(code.to_string())),
        }
    }

    fn execute_action(
        &mut self,
        code: &str,
        event: Option<&Event>,
    ) -> Result<Vec<Event>, EvalError> {
        match self.actions.get(code) {
            Some(action) => Ok(action(event)),
            None => Err(EvalError::UnknownAction(code.to_string())),
        }
    }
}
