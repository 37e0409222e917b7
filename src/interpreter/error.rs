//! Execution errors.

use crate::evaluator::EvalError;
use thiserror::Error;

/// Errors raised while processing a macro-step.
///
/// `NonDeterminism` and `Conflict` are detected before any micro-step of
/// the offending batch is applied, so the configuration is untouched when
/// they surface. `Guard` and `Action` abort the macro-step wherever it
/// stands; already-applied micro-steps remain applied, and callers that
/// need atomicity must snapshot configuration and history themselves.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(
        "non-deterministic transitions `{first}` and `{second}`: \
         their least common ancestor is not an orthogonal state"
    )]
    NonDeterminism { first: String, second: String },

    #[error("conflicting transitions `{first}` and `{second}`: a target escapes its region")]
    Conflict { first: String, second: String },

    #[error("guard `{guard}` on transition `{transition}` failed to evaluate")]
    Guard {
        guard: String,
        transition: String,
        #[source]
        source: EvalError,
    },

    #[error("action `{action}` failed to execute")]
    Action {
        action: String,
        #[source]
        source: EvalError,
    },
}
