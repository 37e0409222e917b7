//! The step interpreter.
//!
//! An [`Interpreter`] owns the active configuration, the history memory and
//! the pending-event queue for one statechart instance. Each call to
//! [`execute_once`](Interpreter::execute_once) performs one macro-step:
//! select enabled transitions (eventless ones take priority over queued
//! events), validate and order them, apply their micro-steps, then
//! stabilize the configuration until every active leaf is a genuine leaf of
//! the tree.
//!
//! Execution is single-threaded, synchronous and cooperative: orthogonal
//! regions are interleaved deterministically inside a macro-step, and
//! `execute_once` always runs to completion. If several actors feed events
//! into one interpreter, they must serialize their `send` calls (for
//! example behind a mutex); no finer-grained concurrency exists inside a
//! step.

mod error;
mod order;
mod select;

use crate::core::{Event, MacroStep, MicroStep, State, Statechart};
use crate::evaluator::{Evaluator, NullEvaluator};
use order::order_transitions;
use select::select_transitions;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, trace};

pub use error::ExecutionError;

/// Discrete-event interpreter for a [`Statechart`].
///
/// # Example
///
/// ```rust
/// use strata::{Event, Interpreter, State, StatechartBuilder, TransitionBuilder};
/// use std::sync::Arc;
///
/// let chart = StatechartBuilder::new("switch")
///     .initial("off")
///     .state("off", State::basic())
///     .state("on", State::basic())
///     .transition(TransitionBuilder::from("off").to("on").on("flip").build())
///     .build()
///     .unwrap();
///
/// let mut interpreter = Interpreter::new(Arc::new(chart)).unwrap();
/// assert_eq!(interpreter.configuration(), ["off"]);
///
/// interpreter.send(Event::new("flip"));
/// let macro_step = interpreter.execute_once().unwrap().unwrap();
/// assert_eq!(macro_step.entered_states(), ["on"]);
/// assert_eq!(interpreter.configuration(), ["on"]);
/// ```
pub struct Interpreter<E: Evaluator = NullEvaluator> {
    chart: Arc<Statechart>,
    evaluator: E,
    configuration: BTreeSet<String>,
    memory: BTreeMap<String, Vec<String>>,
    queue: VecDeque<Event>,
    startup_steps: Vec<MicroStep>,
}

impl Interpreter<NullEvaluator> {
    /// Create and start an interpreter with the [`NullEvaluator`].
    pub fn new(chart: Arc<Statechart>) -> Result<Self, ExecutionError> {
        Self::with_evaluator(chart, NullEvaluator)
    }
}

impl<E: Evaluator> Interpreter<E> {
    /// Create an interpreter with the given evaluator and run it to its
    /// initial stable configuration.
    pub fn with_evaluator(chart: Arc<Statechart>, evaluator: E) -> Result<Self, ExecutionError> {
        let mut interpreter = Self {
            chart,
            evaluator,
            configuration: BTreeSet::new(),
            memory: BTreeMap::new(),
            queue: VecDeque::new(),
            startup_steps: Vec::new(),
        };
        interpreter.start()?;
        Ok(interpreter)
    }

    /// The interpreted chart.
    pub fn chart(&self) -> &Statechart {
        &self.chart
    }

    /// The evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Mutable access to the evaluator.
    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    /// Active state names, ordered by ascending depth (name as tie-break).
    pub fn configuration(&self) -> Vec<String> {
        let mut active: Vec<String> = self.configuration.iter().cloned().collect();
        active.sort_by_key(|name| (self.chart.depth_of(name), name.clone()));
        active
    }

    /// The micro-steps produced by startup (or by the last `reset`).
    pub fn startup_steps(&self) -> &[MicroStep] {
        &self.startup_steps
    }

    /// Whether the chart can still make progress: false once every active
    /// leaf is a final state.
    pub fn running(&self) -> bool {
        self.chart
            .leaf_for(&self.configuration)
            .iter()
            .any(|leaf| !self.chart.state(leaf).is_some_and(State::is_final))
    }

    /// Enqueue an external event at the back of the queue. Returns
    /// immediately; nothing is processed until the next macro-step.
    pub fn send(&mut self, event: Event) -> &mut Self {
        self.queue.push_back(event);
        self
    }

    /// Enqueue an internal event at the front of the queue, ahead of every
    /// pending external event.
    pub fn send_internal(&mut self, event: Event) -> &mut Self {
        self.queue.push_front(event);
        self
    }

    /// Discard the configuration, history memory and pending events, then
    /// re-run startup. A reset interpreter reproduces the step sequences of
    /// a fresh one, byte for byte, given the same event schedule.
    pub fn reset(&mut self) -> Result<(), ExecutionError> {
        self.configuration.clear();
        self.memory.clear();
        self.queue.clear();
        self.start()
    }

    /// Process at most one macro-step: eventless transitions first, then
    /// the oldest queued event. An event that matches no transition is
    /// consumed and reported as a no-op macro-step. Returns `None` when
    /// there is nothing to do.
    pub fn execute_once(&mut self) -> Result<Option<MacroStep>, ExecutionError> {
        let mut event = None;
        let mut selected =
            select_transitions(&self.chart, &self.configuration, &mut self.evaluator, None)?;

        if selected.is_empty() {
            let Some(pending) = self.queue.pop_front() else {
                return Ok(None);
            };
            selected = select_transitions(
                &self.chart,
                &self.configuration,
                &mut self.evaluator,
                Some(&pending),
            )?;
            if selected.is_empty() {
                debug!(event = %pending, "event matched no transition, discarding");
                let step = MicroStep::new(Some(pending), None, Vec::new(), Vec::new());
                return Ok(Some(MacroStep::new(vec![step])));
            }
            event = Some(pending);
        }

        let ordered = order_transitions(&self.chart, selected)?;
        let mut steps = self.compute_transition_steps(event.as_ref(), &ordered);
        for step in &steps {
            self.apply_step(step)?;
        }

        steps.extend(self.stabilize()?);
        debug!(
            event = event.as_ref().map(|e| e.name.as_str()),
            micro_steps = steps.len(),
            "macro-step complete"
        );
        Ok(Some(MacroStep::new(steps)))
    }

    /// Repeatedly call [`execute_once`](Self::execute_once) until nothing
    /// remains to do, or until `max_steps` macro-steps have been produced.
    pub fn execute(&mut self, max_steps: Option<usize>) -> Result<Vec<MacroStep>, ExecutionError> {
        let mut macro_steps = Vec::new();
        if max_steps == Some(0) {
            return Ok(macro_steps);
        }
        while let Some(macro_step) = self.execute_once()? {
            macro_steps.push(macro_step);
            if max_steps.is_some_and(|bound| macro_steps.len() >= bound) {
                break;
            }
        }
        Ok(macro_steps)
    }

    /// Run the chart-level entry action, enter the chart's initial state
    /// through a synthetic micro-step and stabilize.
    fn start(&mut self) -> Result<(), ExecutionError> {
        if let Some(code) = self.chart.on_entry() {
            let code = code.to_string();
            let raised = self
                .evaluator
                .execute_action(&code, None)
                .map_err(|e| ExecutionError::Action {
                    action: code,
                    source: e,
                })?;
            self.enqueue_raised(raised);
        }

        let step = MicroStep::new(
            None,
            None,
            vec![self.chart.initial().to_string()],
            Vec::new(),
        );
        self.apply_step(&step)?;

        let mut steps = vec![step];
        steps.extend(self.stabilize()?);
        self.startup_steps = steps;
        Ok(())
    }

    /// One micro-step per transition, in firing order. A transition without
    /// a target is internal: empty entered/exited lists, only its action
    /// runs. Otherwise the exited set is every active descendant of the
    /// source's branch under the LCA (deepest first) plus the branch root
    /// itself, and the entered set is the target's ancestor chain below the
    /// LCA (shallowest first) ending at the target.
    fn compute_transition_steps(
        &self,
        event: Option<&Event>,
        ordered: &[usize],
    ) -> Vec<MicroStep> {
        let mut steps = Vec::with_capacity(ordered.len());

        for &index in ordered {
            let transition = &self.chart.transitions()[index];
            let Some(target) = &transition.target else {
                steps.push(MicroStep::new(
                    event.cloned(),
                    Some(transition.clone()),
                    Vec::new(),
                    Vec::new(),
                ));
                continue;
            };

            let lca = self.chart.least_common_ancestor(&transition.source, target);
            let branch = self.chart.branch_root(&transition.source, lca.as_deref());

            let mut exited: Vec<String> = self
                .chart
                .descendants_for(&branch)
                .into_iter()
                .rev()
                .filter(|descendant| self.configuration.contains(descendant))
                .collect();
            if self.configuration.contains(&branch) {
                exited.push(branch);
            }

            let mut entered = vec![target.clone()];
            for ancestor in self.chart.ancestors_for(target) {
                if Some(ancestor.as_str()) == lca.as_deref() {
                    break;
                }
                entered.insert(0, ancestor);
            }

            steps.push(MicroStep::new(
                event.cloned(),
                Some(transition.clone()),
                entered,
                exited,
            ));
        }

        steps
    }

    /// Apply a micro-step: exit actions (deepest first), history capture,
    /// removal from the configuration, the transition action, entry actions
    /// (shallowest first), insertion into the configuration. Raised events
    /// are spliced at the queue front, one contiguous block per action.
    fn apply_step(&mut self, step: &MicroStep) -> Result<(), ExecutionError> {
        trace!(
            entered = ?step.entered_states,
            exited = ?step.exited_states,
            transition = step.transition.as_ref().map(|t| t.to_string()),
            "applying micro-step"
        );

        for name in &step.exited_states {
            if let Some(code) = self.chart.state(name).and_then(State::on_exit) {
                let code = code.to_string();
                self.run_action(&code, step.event.as_ref())?;
            }
        }

        self.capture_history(&step.exited_states);

        for name in &step.exited_states {
            self.configuration.remove(name);
        }

        if let Some(code) = step
            .transition
            .as_ref()
            .and_then(|transition| transition.action.clone())
        {
            self.run_action(&code, step.event.as_ref())?;
        }

        for name in &step.entered_states {
            if let Some(code) = self.chart.state(name).and_then(State::on_entry) {
                let code = code.to_string();
                self.run_action(&code, step.event.as_ref())?;
            }
        }

        for name in &step.entered_states {
            self.configuration.insert(name.clone());
        }

        Ok(())
    }

    /// Record history memory for every exited compound state that owns a
    /// history child. Deep history remembers every active descendant,
    /// shallow history the single active immediate child. Capture runs
    /// before the exited states leave the configuration.
    fn capture_history(&mut self, exited_states: &[String]) {
        for name in exited_states {
            let Some(State::Compound { children, .. }) = self.chart.state(name) else {
                continue;
            };
            for child in children {
                let Some(State::History { deep, .. }) = self.chart.state(child) else {
                    continue;
                };
                let remembered: Vec<String> = if *deep {
                    self.chart
                        .descendants_for(name)
                        .into_iter()
                        .filter(|descendant| self.configuration.contains(descendant))
                        .collect()
                } else {
                    children
                        .iter()
                        .filter(|sibling| self.configuration.contains(*sibling))
                        .cloned()
                        .collect()
                };
                debug_assert!(
                    !remembered.is_empty(),
                    "exited compound `{name}` had no active children to remember"
                );
                self.memory.insert(child.clone(), remembered);
            }
        }
    }

    /// One completion step for the innermost active states, or `None` when
    /// the configuration is stable. A history leaf resolves to its memory
    /// (or its default) and exits itself; an orthogonal leaf enters all its
    /// regions at once; a compound leaf enters its initial child.
    fn compute_stabilization_step(&self) -> Option<MicroStep> {
        for leaf in self.chart.leaf_for(&self.configuration) {
            match self.chart.state(&leaf)? {
                State::History { default, .. } => {
                    let mut entered = self
                        .memory
                        .get(&leaf)
                        .cloned()
                        .unwrap_or_else(|| vec![default.clone()]);
                    entered.sort_by_key(|name| self.chart.depth_of(name));
                    return Some(MicroStep::new(None, None, entered, vec![leaf]));
                }
                State::Orthogonal { children, .. } => {
                    return Some(MicroStep::new(None, None, children.clone(), Vec::new()));
                }
                State::Compound {
                    initial: Some(initial),
                    ..
                } => {
                    return Some(MicroStep::new(
                        None,
                        None,
                        vec![initial.clone()],
                        Vec::new(),
                    ));
                }
                _ => {}
            }
        }
        None
    }

    /// Apply completion steps until none remains. Each step is applied
    /// before recomputing, since applying it changes which states are
    /// leaves.
    fn stabilize(&mut self) -> Result<Vec<MicroStep>, ExecutionError> {
        let mut steps = Vec::new();
        while let Some(step) = self.compute_stabilization_step() {
            self.apply_step(&step)?;
            steps.push(step);
        }
        Ok(steps)
    }

    fn run_action(&mut self, code: &str, event: Option<&Event>) -> Result<(), ExecutionError> {
        let raised = self
            .evaluator
            .execute_action(code, event)
            .map_err(|e| ExecutionError::Action {
                action: code.to_string(),
                source: e,
            })?;
        self.enqueue_raised(raised);
        Ok(())
    }

    /// Splice one action's raised events at the queue front as a block,
    /// preserving their emission order.
    fn enqueue_raised(&mut self, raised: Vec<Event>) {
        for event in raised.into_iter().rev() {
            self.queue.push_front(event);
        }
    }
}
