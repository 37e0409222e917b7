//! The statechart tree and its hierarchy queries.
//!
//! A [`Statechart`] is produced by
//! [`StatechartBuilder`](crate::builder::StatechartBuilder), which validates
//! the structure; the query methods here assume a well-formed tree. The
//! interpreter treats the chart as read-only shared input.

use super::{State, Transition};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A validated statechart: the state tree, the chart-level initial state and
/// entry action, and the transition table.
#[derive(Clone, Debug)]
pub struct Statechart {
    name: String,
    initial: String,
    on_entry: Option<String>,
    states: BTreeMap<String, State>,
    transitions: Vec<Transition>,
    parent: BTreeMap<String, String>,
    outgoing: BTreeMap<String, Vec<usize>>,
}

impl Statechart {
    pub(crate) fn assemble(
        name: String,
        initial: String,
        on_entry: Option<String>,
        states: BTreeMap<String, State>,
        transitions: Vec<Transition>,
        parent: BTreeMap<String, String>,
    ) -> Self {
        let mut outgoing: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, transition) in transitions.iter().enumerate() {
            outgoing
                .entry(transition.source.clone())
                .or_default()
                .push(index);
        }
        Self {
            name,
            initial,
            on_entry,
            states,
            transitions,
            parent,
            outgoing,
        }
    }

    /// Chart name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The chart-level initial state.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// The chart-level entry action, executed once at startup.
    pub fn on_entry(&self) -> Option<&str> {
        self.on_entry.as_deref()
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// All declared state names, in name order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// The full transition table; selection results index into it.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions declared on the given source state, with their indices
    /// into [`transitions`](Self::transitions).
    pub fn transitions_from<'a>(
        &'a self,
        source: &str,
    ) -> impl Iterator<Item = (usize, &'a Transition)> {
        self.outgoing
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&index| (index, &self.transitions[index]))
    }

    /// Parent of a state, `None` for top-level states.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parent.get(name).map(String::as_str)
    }

    /// Proper ancestors of a state, closest parent first, root-most last.
    pub fn ancestors_for(&self, name: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut current = name;
        while let Some(parent) = self.parent_of(current) {
            ancestors.push(parent.to_string());
            current = parent;
        }
        ancestors
    }

    /// Proper descendants of a state in breadth-first order, so depth is
    /// ascending and reversal yields a deepest-first order.
    pub fn descendants_for(&self, name: &str) -> Vec<String> {
        let mut descendants = Vec::new();
        let mut frontier: VecDeque<&str> = VecDeque::new();
        frontier.push_back(name);
        while let Some(current) = frontier.pop_front() {
            if let Some(state) = self.state(current) {
                for child in state.children() {
                    descendants.push(child.clone());
                    frontier.push_back(child);
                }
            }
        }
        descendants
    }

    /// Number of proper ancestors; 0 for top-level states.
    pub fn depth_of(&self, name: &str) -> usize {
        let mut depth = 0;
        let mut current = name;
        while let Some(parent) = self.parent_of(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// The first common *proper* ancestor of two states, or `None` when
    /// both are top-level. Note that `least_common_ancestor(s, s)` is the
    /// parent of `s`, which gives self-transitions external semantics.
    pub fn least_common_ancestor(&self, a: &str, b: &str) -> Option<String> {
        let b_ancestors: BTreeSet<String> = self.ancestors_for(b).into_iter().collect();
        self.ancestors_for(a)
            .into_iter()
            .find(|ancestor| b_ancestors.contains(ancestor))
    }

    /// The last ancestor of `state` (or `state` itself) visited before
    /// reaching `boundary`; with no boundary, the top-level ancestor.
    pub fn branch_root(&self, state: &str, boundary: Option<&str>) -> String {
        let mut branch = state.to_string();
        for ancestor in self.ancestors_for(state) {
            if Some(ancestor.as_str()) == boundary {
                break;
            }
            branch = ancestor;
        }
        branch
    }

    /// The innermost states of a configuration: active states with no
    /// active proper descendant, in name order.
    pub fn leaf_for(&self, configuration: &BTreeSet<String>) -> Vec<String> {
        configuration
            .iter()
            .filter(|name| {
                !configuration
                    .iter()
                    .any(|other| *other != **name && self.is_ancestor(name, other))
            })
            .cloned()
            .collect()
    }

    /// Whether `ancestor` is a proper ancestor of `state`.
    fn is_ancestor(&self, ancestor: &str, state: &str) -> bool {
        let mut current = state;
        while let Some(parent) = self.parent_of(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }
}
