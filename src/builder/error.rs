//! Build errors for chart construction.

use thiserror::Error;

/// Errors raised by [`StatechartBuilder::build`](super::StatechartBuilder::build)
/// when the declared structure is not a well-formed statechart.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BuildError {
    #[error("initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("duplicate state name `{0}`")]
    DuplicateState(String),

    #[error("initial state `{0}` is not declared")]
    UnknownInitial(String),

    #[error("state `{parent}` lists unknown child `{child}`")]
    UnknownChild { parent: String, child: String },

    #[error("state `{child}` is a child of both `{first}` and `{second}`")]
    DuplicateParent {
        child: String,
        first: String,
        second: String,
    },

    #[error("initial child `{initial}` of `{state}` is not one of its children")]
    InitialNotChild { state: String, initial: String },

    #[error("history state `{0}` must be the child of a compound state")]
    HistoryOutsideCompound(String),

    #[error("default `{default}` of history state `{state}` is not a sibling")]
    HistoryDefaultNotSibling { state: String, default: String },

    #[error("transition source `{0}` is not declared")]
    UnknownSource(String),

    #[error("transition target `{0}` is not declared")]
    UnknownTarget(String),

    #[error("final state `{0}` cannot have outgoing transitions")]
    TransitionFromFinal(String),
}
