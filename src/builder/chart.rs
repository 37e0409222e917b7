//! Builder for validated statecharts.

use super::error::BuildError;
use crate::core::{State, Statechart, Transition};
use std::collections::BTreeMap;

/// Builder for constructing statecharts with a fluent API.
///
/// `build()` validates the declared structure: every referenced state must
/// be declared, every state has at most one parent, compound initial
/// children and history defaults must stay inside their parent, and final
/// states cannot have outgoing transitions.
///
/// # Example
///
/// ```rust
/// use strata::{State, StatechartBuilder, TransitionBuilder};
///
/// let chart = StatechartBuilder::new("switch")
///     .initial("off")
///     .state("off", State::basic())
///     .state("on", State::basic())
///     .transition(TransitionBuilder::from("off").to("on").on("flip").build())
///     .transition(TransitionBuilder::from("on").to("off").on("flip").build())
///     .build()
///     .unwrap();
///
/// assert_eq!(chart.initial(), "off");
/// ```
pub struct StatechartBuilder {
    name: String,
    initial: Option<String>,
    on_entry: Option<String>,
    states: Vec<(String, State)>,
    transitions: Vec<Transition>,
}

impl StatechartBuilder {
    /// Create a new builder for a chart with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: None,
            on_entry: None,
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Set the chart-level initial state (required).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Set the chart-level entry action, executed once at startup.
    pub fn on_entry(mut self, code: impl Into<String>) -> Self {
        self.on_entry = Some(code.into());
        self
    }

    /// Declare a state.
    pub fn state(mut self, name: impl Into<String>, state: State) -> Self {
        self.states.push((name.into(), state));
        self
    }

    /// Add a transition.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Validate the declared structure and build the chart.
    pub fn build(self) -> Result<Statechart, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let mut states: BTreeMap<String, State> = BTreeMap::new();
        for (name, state) in self.states {
            if states.insert(name.clone(), state).is_some() {
                return Err(BuildError::DuplicateState(name));
            }
        }

        if !states.contains_key(&initial) {
            return Err(BuildError::UnknownInitial(initial));
        }

        // Child references: declared, and owned by exactly one parent.
        let mut parent: BTreeMap<String, String> = BTreeMap::new();
        for (name, state) in &states {
            for child in state.children() {
                if !states.contains_key(child) {
                    return Err(BuildError::UnknownChild {
                        parent: name.clone(),
                        child: child.clone(),
                    });
                }
                if let Some(first) = parent.insert(child.clone(), name.clone()) {
                    return Err(BuildError::DuplicateParent {
                        child: child.clone(),
                        first,
                        second: name.clone(),
                    });
                }
            }
        }

        for (name, state) in &states {
            match state {
                State::Compound {
                    children,
                    initial: Some(initial_child),
                    ..
                } => {
                    if !children.contains(initial_child) {
                        return Err(BuildError::InitialNotChild {
                            state: name.clone(),
                            initial: initial_child.clone(),
                        });
                    }
                }
                State::History { default, .. } => {
                    let compound_parent = parent.get(name).and_then(|p| {
                        matches!(states.get(p), Some(State::Compound { .. })).then_some(p)
                    });
                    let Some(owner) = compound_parent else {
                        return Err(BuildError::HistoryOutsideCompound(name.clone()));
                    };
                    let siblings = states[owner].children();
                    if !siblings.contains(default) {
                        return Err(BuildError::HistoryDefaultNotSibling {
                            state: name.clone(),
                            default: default.clone(),
                        });
                    }
                }
                _ => {}
            }
        }

        for transition in &self.transitions {
            match states.get(&transition.source) {
                None => return Err(BuildError::UnknownSource(transition.source.clone())),
                Some(state) if state.is_final() => {
                    return Err(BuildError::TransitionFromFinal(transition.source.clone()))
                }
                Some(_) => {}
            }
            if let Some(target) = &transition.target {
                if !states.contains_key(target) {
                    return Err(BuildError::UnknownTarget(target.clone()));
                }
            }
        }

        Ok(Statechart::assemble(
            self.name,
            initial,
            self.on_entry,
            states,
            self.transitions,
            parent,
        ))
    }
}
