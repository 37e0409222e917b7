//! A hierarchical traffic light with history.
//!
//! The light cycles red -> green -> yellow while operational. A power
//! failure drops it into a blinking mode; when power returns, shallow
//! history restores whichever color was active before the failure.
//!
//! Run with: cargo run --example traffic_light

use std::sync::Arc;
use strata::{Event, Interpreter, State, StatechartBuilder, TransitionBuilder};

fn main() {
    let chart = StatechartBuilder::new("traffic-light")
        .initial("light")
        .state("light", State::compound(["operational", "blinking"], Some("operational")))
        .state(
            "operational",
            State::compound(["red", "green", "yellow", "memory"], Some("red")),
        )
        .state("red", State::basic())
        .state("green", State::basic())
        .state("yellow", State::basic())
        .state("memory", State::history(false, "red"))
        .state("blinking", State::basic())
        .transition(TransitionBuilder::from("red").to("green").on("tick").build())
        .transition(TransitionBuilder::from("green").to("yellow").on("tick").build())
        .transition(TransitionBuilder::from("yellow").to("red").on("tick").build())
        .transition(
            TransitionBuilder::from("operational")
                .to("blinking")
                .on("power_failure")
                .build(),
        )
        .transition(
            TransitionBuilder::from("blinking")
                .to("memory")
                .on("power_restored")
                .build(),
        )
        .build()
        .expect("valid chart");

    let mut interpreter = Interpreter::new(Arc::new(chart)).expect("startup");
    println!("startup: {:?}", interpreter.configuration());

    for name in ["tick", "power_failure", "power_restored", "tick"] {
        interpreter.send(Event::new(name));
        for macro_step in interpreter.execute(None).expect("macro-step") {
            println!(
                "{:<16} entered {:?}, exited {:?}",
                name,
                macro_step.entered_states(),
                macro_step.exited_states()
            );
        }
        println!("  -> {:?}", interpreter.configuration());
    }
}
