//! Strata: a discrete-event interpreter for hierarchical, parallel statecharts
//!
//! Strata executes statecharts with SCXML-like semantics: compound (nested)
//! states, orthogonal (parallel) regions, shallow and deep history,
//! eventless and guarded transitions, and entry/exit actions that may raise
//! further events.
//!
//! # Core Concepts
//!
//! - **Statechart**: the validated state tree and transition table, built
//!   through [`StatechartBuilder`]
//! - **Configuration**: the set of currently active state names, owned by
//!   the [`Interpreter`]
//! - **Micro-step / macro-step**: one atomic configuration change, and one
//!   external "tick" (the fired transitions plus all stabilization steps)
//! - **Evaluator**: pluggable guard evaluation and action execution
//!
//! # Example
//!
//! ```rust
//! use strata::{Event, Interpreter, State, StatechartBuilder, TransitionBuilder};
//! use std::sync::Arc;
//!
//! // A two-region parallel state: both regions activate together.
//! let chart = StatechartBuilder::new("player")
//!     .initial("active")
//!     .state("active", State::orthogonal(["audio", "video"]))
//!     .state("audio", State::compound(["muted", "loud"], Some("muted")))
//!     .state("muted", State::basic())
//!     .state("loud", State::basic())
//!     .state("video", State::compound(["paused", "playing"], Some("paused")))
//!     .state("paused", State::basic())
//!     .state("playing", State::basic())
//!     .transition(TransitionBuilder::from("paused").to("playing").on("play").build())
//!     .build()
//!     .unwrap();
//!
//! let mut interpreter = Interpreter::new(Arc::new(chart)).unwrap();
//! assert_eq!(
//!     interpreter.configuration(),
//!     ["active", "audio", "video", "muted", "paused"]
//! );
//!
//! interpreter.send(Event::new("play"));
//! interpreter.execute(None).unwrap();
//! assert!(interpreter.configuration().contains(&"playing".to_string()));
//! ```

pub mod builder;
pub mod core;
pub mod evaluator;
pub mod interpreter;

// Re-export commonly used types
pub use builder::{BuildError, StatechartBuilder, TransitionBuilder};
pub use self::core::{Event, MacroStep, MicroStep, State, Statechart, Transition};
pub use evaluator::{EvalError, Evaluator, NullEvaluator, TableEvaluator};
pub use interpreter::{ExecutionError, Interpreter};
