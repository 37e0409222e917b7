//! Guard and action evaluation.
//!
//! The interpreter never interprets guard or action code itself; it hands
//! the opaque code strings to an [`Evaluator`]. Two implementations ship
//! with the crate: [`NullEvaluator`] for purely structural charts and
//! [`TableEvaluator`], a closure registry keyed by code string.

mod table;

use crate::core::Event;
use thiserror::Error;

pub use table::TableEvaluator;

/// Errors surfaced by guard evaluation or action execution.
///
/// The interpreter does not catch or retry these; they abort the
/// in-progress macro-step and propagate to the caller.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("unknown condition `{0}`")]
    UnknownCondition(String),

    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("evaluation failed: {0}")]
    Failure(String),
}

/// Pluggable guard/action evaluation.
///
/// Methods take `&mut self` so evaluators may keep their own context
/// variables across calls. Actions report the events they raise by
/// *returning* them; the interpreter enqueues them after the action
/// completes, so an action can never corrupt the transition set of the
/// step that invoked it.
pub trait Evaluator {
    /// Evaluate guard code against the triggering event (if any).
    fn evaluate_condition(&mut self, code: &str, event: Option<&Event>)
        -> Result<bool, EvalError>;

    /// Execute action code, returning the events it raised.
    fn execute_action(
        &mut self,
        code: &str,
        event: Option<&Event>,
    ) -> Result<Vec<Event>, EvalError>;
}

/// Evaluator for charts without meaningful guard or action code: every
/// condition holds and every action raises nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEvaluator;

impl Evaluator for NullEvaluator {
    fn evaluate_condition(
        &mut self,
        _code: &str,
        _event: Option<&Event>,
    ) -> Result<bool, EvalError> {
        Ok(true)
    }

    fn execute_action(
        &mut self,
        _code: &str,
        _event: Option<&Event>,
    ) -> Result<Vec<Event>, EvalError> {
        Ok(Vec::new())
    }
}
