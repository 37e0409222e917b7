//! Fluent builders for charts and transitions, with structural validation.

mod chart;
mod error;
mod transition;

pub use chart::StatechartBuilder;
pub use error::BuildError;
pub use transition::TransitionBuilder;
