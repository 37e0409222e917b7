//! An elevator with orthogonal door and motion regions.
//!
//! The doors and the motor live in parallel regions of one orthogonal
//! state: a single `depart` event closes the doors and starts the motor in
//! the same macro-step. The door-closed action raises an internal event
//! that the motion region reacts to before any queued external event.
//!
//! Run with: cargo run --example elevator

use std::sync::Arc;
use strata::{Event, Interpreter, State, StatechartBuilder, TableEvaluator, TransitionBuilder};

fn main() {
    let chart = StatechartBuilder::new("elevator")
        .initial("cabin")
        .state("cabin", State::orthogonal(["doors", "motion"]))
        .state("doors", State::compound(["open", "closing", "closed"], Some("open")))
        .state("open", State::basic())
        .state("closing", State::basic().with_entry("latch"))
        .state("closed", State::basic())
        .state("motion", State::compound(["idle", "moving"], Some("idle")))
        .state("idle", State::basic())
        .state("moving", State::basic())
        .transition(TransitionBuilder::from("open").to("closing").on("depart").build())
        .transition(TransitionBuilder::from("closing").to("closed").on("latched").build())
        .transition(TransitionBuilder::from("idle").to("moving").on("latched").build())
        .transition(TransitionBuilder::from("moving").to("idle").on("arrive").build())
        .transition(TransitionBuilder::from("closed").to("open").on("arrive").build())
        .build()
        .expect("valid chart");

    // Latching the doors raises the internal `latched` event.
    let evaluator = TableEvaluator::new().action("latch", |_| vec![Event::new("latched")]);

    let mut interpreter =
        Interpreter::with_evaluator(Arc::new(chart), evaluator).expect("startup");
    println!("startup: {:?}", interpreter.configuration());

    for name in ["depart", "arrive"] {
        interpreter.send(Event::new(name));
        for macro_step in interpreter.execute(None).expect("macro-step") {
            let consumed = macro_step
                .event()
                .map(|event| event.name.clone())
                .unwrap_or_else(|| "(eventless)".to_string());
            println!(
                "{:<12} fired {} transition(s): entered {:?}",
                consumed,
                macro_step.transitions().len(),
                macro_step.entered_states()
            );
        }
        println!("  -> {:?}", interpreter.configuration());
    }
}
