//! State variants of the statechart tree.
//!
//! The variant set is closed: the stabilizer and the step executor match on
//! it exhaustively, so behavior per variant is structural rather than
//! dispatched through a trait object.

use serde::{Deserialize, Serialize};

/// A node in the statechart tree.
///
/// Every variant except `History` may carry entry/exit action code; the
/// code strings are opaque to the core and are handed to the
/// [`Evaluator`](crate::evaluator::Evaluator) when the state is entered or
/// exited.
///
/// # Example
///
/// ```rust
/// use strata::State;
///
/// let leaf = State::basic();
/// let region = State::compound(["idle", "busy"], Some("idle"));
///
/// assert!(leaf.children().is_empty());
/// assert_eq!(region.children(), ["idle", "busy"]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum State {
    /// A leaf state.
    Basic {
        on_entry: Option<String>,
        on_exit: Option<String>,
    },
    /// A nested state with exclusive children; at most one child subtree is
    /// active at a time.
    Compound {
        children: Vec<String>,
        /// Child entered when the compound state is activated without an
        /// explicit target. A compound state without an initial child is
        /// treated as terminal by the stabilizer.
        initial: Option<String>,
        on_entry: Option<String>,
        on_exit: Option<String>,
    },
    /// A parallel state; all children (regions) are active simultaneously.
    Orthogonal {
        children: Vec<String>,
        on_entry: Option<String>,
        on_exit: Option<String>,
    },
    /// A history pseudo-state. Never persistently active: when targeted, it
    /// resolves to the children of its parent that were active when the
    /// parent was last exited, or to `default` if no memory exists yet.
    History {
        /// Deep history remembers the full set of active descendants;
        /// shallow history remembers the single active immediate child.
        deep: bool,
        /// Sibling entered when the history has no recorded memory.
        default: String,
    },
    /// A terminal leaf with no outgoing transitions. A configuration whose
    /// leaves are all final states is no longer running.
    Final {
        on_entry: Option<String>,
        on_exit: Option<String>,
    },
}

impl State {
    /// A basic state with no actions.
    pub fn basic() -> Self {
        State::Basic {
            on_entry: None,
            on_exit: None,
        }
    }

    /// A compound state over the given children.
    pub fn compound<I, S>(children: I, initial: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        State::Compound {
            children: children.into_iter().map(Into::into).collect(),
            initial: initial.map(str::to_string),
            on_entry: None,
            on_exit: None,
        }
    }

    /// An orthogonal state over the given regions.
    pub fn orthogonal<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        State::Orthogonal {
            children: children.into_iter().map(Into::into).collect(),
            on_entry: None,
            on_exit: None,
        }
    }

    /// A history pseudo-state with the given default sibling.
    pub fn history(deep: bool, default: impl Into<String>) -> Self {
        State::History {
            deep,
            default: default.into(),
        }
    }

    /// A final state with no actions.
    pub fn final_state() -> Self {
        State::Final {
            on_entry: None,
            on_exit: None,
        }
    }

    /// Attach entry action code; no effect on history pseudo-states.
    pub fn with_entry(mut self, code: impl Into<String>) -> Self {
        if let State::Basic { on_entry, .. }
        | State::Compound { on_entry, .. }
        | State::Orthogonal { on_entry, .. }
        | State::Final { on_entry, .. } = &mut self
        {
            *on_entry = Some(code.into());
        }
        self
    }

    /// Attach exit action code; no effect on history pseudo-states.
    pub fn with_exit(mut self, code: impl Into<String>) -> Self {
        if let State::Basic { on_exit, .. }
        | State::Compound { on_exit, .. }
        | State::Orthogonal { on_exit, .. }
        | State::Final { on_exit, .. } = &mut self
        {
            *on_exit = Some(code.into());
        }
        self
    }

    /// Child state names, empty for leaves and pseudo-states.
    pub fn children(&self) -> &[String] {
        match self {
            State::Compound { children, .. } | State::Orthogonal { children, .. } => children,
            _ => &[],
        }
    }

    /// Entry action code, if any.
    pub fn on_entry(&self) -> Option<&str> {
        match self {
            State::Basic { on_entry, .. }
            | State::Compound { on_entry, .. }
            | State::Orthogonal { on_entry, .. }
            | State::Final { on_entry, .. } => on_entry.as_deref(),
            State::History { .. } => None,
        }
    }

    /// Exit action code, if any.
    pub fn on_exit(&self) -> Option<&str> {
        match self {
            State::Basic { on_exit, .. }
            | State::Compound { on_exit, .. }
            | State::Orthogonal { on_exit, .. }
            | State::Final { on_exit, .. } => on_exit.as_deref(),
            State::History { .. } => None,
        }
    }

    /// Whether this is a final state.
    pub fn is_final(&self) -> bool {
        matches!(self, State::Final { .. })
    }
}
