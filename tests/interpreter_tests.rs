//! End-to-end interpreter scenarios: history, orthogonal regions, conflict
//! detection, event-queue ordering, and reproducibility.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use strata::{
    Event, ExecutionError, Interpreter, State, Statechart, StatechartBuilder, TableEvaluator,
    TransitionBuilder,
};

/// Every active state's ancestors must be active as well.
fn assert_consistent(chart: &Statechart, configuration: &[String]) {
    for name in configuration {
        for ancestor in chart.ancestors_for(name) {
            assert!(
                configuration.contains(&ancestor),
                "active state `{name}` has inactive ancestor `{ancestor}`"
            );
        }
    }
}

// root
// ├── work (compound, initial w1)
// │   ├── w1, w2
// │   ├── h  (shallow history, default w1)
// │   └── hd (deep history, default w1)
// └── pause
fn history_chart() -> Arc<Statechart> {
    Arc::new(
        StatechartBuilder::new("history")
            .initial("root")
            .state("root", State::compound(["work", "pause"], Some("work")))
            .state(
                "work",
                State::compound(["w1", "w2", "h", "hd"], Some("w1")),
            )
            .state("w1", State::basic())
            .state("w2", State::basic())
            .state("h", State::history(false, "w1"))
            .state("hd", State::history(true, "w1"))
            .state("pause", State::basic())
            .transition(TransitionBuilder::from("w1").to("w2").on("advance").build())
            .transition(
                TransitionBuilder::from("work")
                    .to("pause")
                    .on("interrupt")
                    .build(),
            )
            .transition(TransitionBuilder::from("pause").to("h").on("resume").build())
            .transition(
                TransitionBuilder::from("pause")
                    .to("hd")
                    .on("resume_deep")
                    .build(),
            )
            .build()
            .unwrap(),
    )
}

// par (orthogonal)
// ├── r1 (compound, initial r1a) ── r1a, r1b
// └── r2 (compound, initial r2a) ── r2a, r2b
fn parallel_chart(extra: Vec<strata::Transition>) -> Arc<Statechart> {
    Arc::new(
        StatechartBuilder::new("parallel")
            .initial("par")
            .state("par", State::orthogonal(["r1", "r2"]))
            .state("r1", State::compound(["r1a", "r1b"], Some("r1a")))
            .state("r2", State::compound(["r2a", "r2b"], Some("r2a")))
            .state("r1a", State::basic())
            .state("r1b", State::basic())
            .state("r2a", State::basic())
            .state("r2b", State::basic())
            .transitions(extra)
            .build()
            .unwrap(),
    )
}

#[test]
fn orthogonal_entry_activates_all_regions() {
    let chart = parallel_chart(vec![]);
    let interpreter = Interpreter::new(chart.clone()).unwrap();

    assert_eq!(
        interpreter.configuration(),
        ["par", "r1", "r2", "r1a", "r2a"]
    );
    assert_consistent(&chart, &interpreter.configuration());

    // One synthetic entry step, then the stabilization sub-sequence: the
    // orthogonal expansion enters both regions in a single micro-step.
    let steps = interpreter.startup_steps();
    assert_eq!(steps[0].entered_states, ["par"]);
    assert_eq!(steps[1].entered_states, ["r1", "r2"]);
}

#[test]
fn parallel_regions_fire_in_one_macro_step() {
    let chart = parallel_chart(vec![
        TransitionBuilder::from("r1a").to("r1b").on("sync").build(),
        TransitionBuilder::from("r2a").to("r2b").on("sync").build(),
    ]);
    let mut interpreter = Interpreter::new(chart.clone()).unwrap();

    interpreter.send(Event::new("sync"));
    let macro_step = interpreter.execute_once().unwrap().unwrap();

    assert_eq!(macro_step.transitions().len(), 2);
    assert_eq!(macro_step.entered_states(), ["r1b", "r2b"]);
    assert_eq!(
        interpreter.configuration(),
        ["par", "r1", "r2", "r1b", "r2b"]
    );
    assert_consistent(&chart, &interpreter.configuration());
}

#[test]
fn conflicting_transitions_leave_configuration_unchanged() {
    let chart = parallel_chart(vec![
        TransitionBuilder::from("r1a").to("r2b").on("bad").build(),
        TransitionBuilder::from("r2a").to("r2b").on("bad").build(),
    ]);
    let mut interpreter = Interpreter::new(chart).unwrap();
    let before = interpreter.configuration();

    interpreter.send(Event::new("bad"));
    let result = interpreter.execute_once();

    assert!(matches!(result, Err(ExecutionError::Conflict { .. })));
    assert_eq!(interpreter.configuration(), before);
}

#[test]
fn same_source_choices_are_non_deterministic() {
    let chart = Arc::new(
        StatechartBuilder::new("ambiguous")
            .initial("root")
            .state("root", State::compound(["a", "b", "c"], Some("a")))
            .state("a", State::basic())
            .state("b", State::basic())
            .state("c", State::basic())
            .transition(TransitionBuilder::from("a").to("b").on("go").build())
            .transition(TransitionBuilder::from("a").to("c").on("go").build())
            .build()
            .unwrap(),
    );
    let mut interpreter = Interpreter::new(chart).unwrap();
    let before = interpreter.configuration();

    interpreter.send(Event::new("go"));
    let result = interpreter.execute_once();

    assert!(matches!(result, Err(ExecutionError::NonDeterminism { .. })));
    assert_eq!(interpreter.configuration(), before);
}

#[test]
fn shallow_history_restores_the_last_active_child() {
    let chart = history_chart();
    let mut interpreter = Interpreter::new(chart.clone()).unwrap();

    interpreter.send(Event::new("advance"));
    interpreter.send(Event::new("interrupt"));
    interpreter.execute(None).unwrap();
    assert_eq!(interpreter.configuration(), ["root", "pause"]);

    interpreter.send(Event::new("resume"));
    interpreter.execute(None).unwrap();

    // w2 was active when `work` was exited; the declared initial is w1.
    assert_eq!(interpreter.configuration(), ["root", "work", "w2"]);
    assert_consistent(&chart, &interpreter.configuration());
}

#[test]
fn deep_history_restores_the_last_active_descendants() {
    let chart = history_chart();
    let mut interpreter = Interpreter::new(chart).unwrap();

    interpreter.send(Event::new("advance"));
    interpreter.send(Event::new("interrupt"));
    interpreter.send(Event::new("resume_deep"));
    interpreter.execute(None).unwrap();

    assert_eq!(interpreter.configuration(), ["root", "work", "w2"]);
}

#[test]
fn history_without_memory_falls_back_to_its_default() {
    // The compound's initial child is the history pseudo-state itself, so
    // the very first stabilization resolves it with no memory recorded.
    let chart = Arc::new(
        StatechartBuilder::new("fallback")
            .initial("work")
            .state("work", State::compound(["w1", "w2", "h"], Some("h")))
            .state("w1", State::basic())
            .state("w2", State::basic())
            .state("h", State::history(false, "w1"))
            .build()
            .unwrap(),
    );
    let interpreter = Interpreter::new(chart).unwrap();
    assert_eq!(interpreter.configuration(), ["work", "w1"]);
}

#[test]
fn unmatched_event_is_a_no_op_macro_step() {
    let chart = parallel_chart(vec![]);
    let mut interpreter = Interpreter::new(chart).unwrap();
    let before = interpreter.configuration();

    interpreter.send(Event::new("X"));
    let macro_step = interpreter.execute_once().unwrap().unwrap();

    assert_eq!(macro_step.steps.len(), 1);
    let step = &macro_step.steps[0];
    assert_eq!(step.event.as_ref().map(|e| e.name.as_str()), Some("X"));
    assert!(step.transition.is_none());
    assert!(step.entered_states.is_empty());
    assert!(step.exited_states.is_empty());
    assert_eq!(interpreter.configuration(), before);
}

#[test]
fn eventless_transitions_preempt_queued_events() {
    let chart = Arc::new(
        StatechartBuilder::new("eventless")
            .initial("root")
            .state("root", State::compound(["a", "b", "c"], Some("a")))
            .state("a", State::basic())
            .state("b", State::basic())
            .state("c", State::basic())
            .transition(TransitionBuilder::from("a").to("b").on("go").build())
            .transition(TransitionBuilder::from("b").to("c").build())
            .transition(TransitionBuilder::from("c").to("a").on("go").build())
            .build()
            .unwrap(),
    );
    let mut interpreter = Interpreter::new(chart).unwrap();

    interpreter.send(Event::new("go"));
    interpreter.send(Event::new("go"));
    let macro_steps = interpreter.execute(None).unwrap();

    let consumed: Vec<Option<&str>> = macro_steps
        .iter()
        .map(|m| m.event().map(|e| e.name.as_str()))
        .collect();
    // The eventless b -> c runs before the second queued `go`.
    assert_eq!(consumed, [Some("go"), None, Some("go")]);
    assert_eq!(interpreter.configuration(), ["root", "a"]);
}

#[test]
fn execute_respects_the_step_bound() {
    let chart = Arc::new(
        StatechartBuilder::new("chain")
            .initial("root")
            .state("root", State::compound(["a", "b", "c"], Some("a")))
            .state("a", State::basic())
            .state("b", State::basic())
            .state("c", State::basic())
            .transition(TransitionBuilder::from("a").to("b").build())
            .transition(TransitionBuilder::from("b").to("c").build())
            .build()
            .unwrap(),
    );
    let mut interpreter = Interpreter::new(chart).unwrap();

    let macro_steps = interpreter.execute(Some(1)).unwrap();
    assert_eq!(macro_steps.len(), 1);
    assert_eq!(interpreter.configuration(), ["root", "b"]);

    // The remaining eventless transition is still eligible.
    let rest = interpreter.execute(None).unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(interpreter.configuration(), ["root", "c"]);
}

#[test]
fn raised_events_are_processed_before_external_ones() {
    let chart = Arc::new(
        StatechartBuilder::new("cascade")
            .initial("root")
            .state("root", State::compound(["a", "b", "c", "d"], Some("a")))
            .state("a", State::basic())
            .state("b", State::basic())
            .state("c", State::basic())
            .state("d", State::basic())
            .transition(
                TransitionBuilder::from("a")
                    .to("b")
                    .on("go")
                    .action("burst")
                    .build(),
            )
            .transition(TransitionBuilder::from("b").to("c").on("e1").build())
            .transition(TransitionBuilder::from("c").to("d").on("e2").build())
            .build()
            .unwrap(),
    );
    let evaluator =
        TableEvaluator::new().action("burst", |_| vec![Event::new("e1"), Event::new("e2")]);
    let mut interpreter = Interpreter::with_evaluator(chart, evaluator).unwrap();

    interpreter.send(Event::new("go"));
    interpreter.send(Event::new("ext"));
    let macro_steps = interpreter.execute(None).unwrap();

    let consumed: Vec<&str> = macro_steps
        .iter()
        .filter_map(|m| m.event().map(|e| e.name.as_str()))
        .collect();
    // The raised block keeps its emission order and preempts `ext`.
    assert_eq!(consumed, ["go", "e1", "e2", "ext"]);
    assert_eq!(interpreter.configuration(), ["root", "d"]);
}

#[test]
fn raised_events_form_front_blocks_in_order() {
    // Two exited states each raise a block; the deeper state exits first,
    // the shallower state's block is pushed in front of it afterwards.
    let chart = Arc::new(
        StatechartBuilder::new("blocks")
            .initial("root")
            .state("root", State::compound(["outer", "away"], Some("outer")))
            .state(
                "outer",
                State::compound(["inner"], Some("inner")).with_exit("raise_outer"),
            )
            .state("inner", State::basic().with_exit("raise_inner"))
            .state("away", State::basic())
            .transition(TransitionBuilder::from("inner").to("away").on("leave").build())
            .build()
            .unwrap(),
    );
    let evaluator = TableEvaluator::new()
        .action("raise_inner", |_| vec![Event::new("i1"), Event::new("i2")])
        .action("raise_outer", |_| vec![Event::new("o1")]);
    let mut interpreter = Interpreter::with_evaluator(chart, evaluator).unwrap();

    interpreter.send(Event::new("leave"));
    let macro_steps = interpreter.execute(None).unwrap();

    let consumed: Vec<&str> = macro_steps
        .iter()
        .filter_map(|m| m.event().map(|e| e.name.as_str()))
        .collect();
    assert_eq!(consumed, ["leave", "o1", "i1", "i2"]);
}

#[test]
fn internal_transition_runs_its_action_without_state_change() {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = counter.clone();

    let chart = Arc::new(
        StatechartBuilder::new("internal")
            .initial("a")
            .state("a", State::basic())
            .transition(TransitionBuilder::from("a").on("ping").action("count").build())
            .build()
            .unwrap(),
    );
    let evaluator = TableEvaluator::new().silent_action("count", move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    let mut interpreter = Interpreter::with_evaluator(chart, evaluator).unwrap();

    interpreter.send(Event::new("ping"));
    let macro_step = interpreter.execute_once().unwrap().unwrap();

    assert_eq!(macro_step.steps.len(), 1);
    assert!(macro_step.steps[0].entered_states.is_empty());
    assert!(macro_step.steps[0].exited_states.is_empty());
    assert!(macro_step.steps[0].transition.is_some());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(interpreter.configuration(), ["a"]);
}

#[test]
fn guard_evaluation_failure_is_fatal() {
    let chart = Arc::new(
        StatechartBuilder::new("broken-guard")
            .initial("a")
            .state("a", State::basic())
            .state("b", State::basic())
            .transition(
                TransitionBuilder::from("a")
                    .to("b")
                    .on("go")
                    .guard("unregistered")
                    .build(),
            )
            .build()
            .unwrap(),
    );
    let mut interpreter = Interpreter::with_evaluator(chart, TableEvaluator::new()).unwrap();

    interpreter.send(Event::new("go"));
    let result = interpreter.execute_once();

    assert!(matches!(result, Err(ExecutionError::Guard { .. })));
    // Detection happens during selection, before any mutation.
    assert_eq!(interpreter.configuration(), ["a"]);
}

#[test]
fn action_execution_failure_aborts_the_macro_step() {
    let chart = Arc::new(
        StatechartBuilder::new("broken-action")
            .initial("a")
            .state("a", State::basic())
            .state("b", State::basic())
            .transition(
                TransitionBuilder::from("a")
                    .to("b")
                    .on("go")
                    .action("unregistered")
                    .build(),
            )
            .build()
            .unwrap(),
    );
    let mut interpreter = Interpreter::with_evaluator(chart, TableEvaluator::new()).unwrap();

    interpreter.send(Event::new("go"));
    let result = interpreter.execute_once();
    assert!(matches!(result, Err(ExecutionError::Action { .. })));
}

#[test]
fn stable_configurations_produce_no_further_steps() {
    let chart = parallel_chart(vec![]);
    let mut interpreter = Interpreter::new(chart).unwrap();
    let stable = interpreter.configuration();

    assert!(interpreter.execute_once().unwrap().is_none());
    assert!(interpreter.execute_once().unwrap().is_none());
    assert_eq!(interpreter.configuration(), stable);
}

#[test]
fn reset_reproduces_identical_macro_steps() {
    let schedule = ["advance", "interrupt", "resume", "advance", "interrupt"];

    let mut interpreter = Interpreter::new(history_chart()).unwrap();
    for name in schedule {
        interpreter.send(Event::new(name));
    }
    let first_run = interpreter.execute(None).unwrap();
    let first_startup = interpreter.startup_steps().to_vec();

    interpreter.reset().unwrap();
    assert_eq!(interpreter.startup_steps(), first_startup.as_slice());
    for name in schedule {
        interpreter.send(Event::new(name));
    }
    let second_run = interpreter.execute(None).unwrap();

    assert_eq!(first_run, second_run);
}

#[test]
fn chart_level_entry_action_runs_at_startup() {
    let chart = Arc::new(
        StatechartBuilder::new("boot")
            .initial("a")
            .on_entry("announce")
            .state("a", State::basic())
            .state("b", State::basic())
            .transition(TransitionBuilder::from("a").to("b").on("booted").build())
            .build()
            .unwrap(),
    );
    let evaluator = TableEvaluator::new().action("announce", |_| vec![Event::new("booted")]);
    let mut interpreter = Interpreter::with_evaluator(chart, evaluator).unwrap();

    // The event raised by the chart preamble is already queued.
    interpreter.execute(None).unwrap();
    assert_eq!(interpreter.configuration(), ["b"]);
}

#[test]
fn configuration_is_ordered_by_depth() {
    let interpreter = Interpreter::new(history_chart()).unwrap();
    let chart = history_chart();
    let configuration = interpreter.configuration();
    let depths: Vec<usize> = configuration
        .iter()
        .map(|name| chart.depth_of(name))
        .collect();
    let mut sorted = depths.clone();
    sorted.sort_unstable();
    assert_eq!(depths, sorted);
}
