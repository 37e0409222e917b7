//! Transition selection.

use super::error::ExecutionError;
use crate::core::{Event, Statechart};
use crate::evaluator::Evaluator;
use std::collections::BTreeSet;

/// Find the transitions enabled by `event` (or the eventless ones when
/// `event` is `None`) in the current configuration.
///
/// For each innermost active state, the walk goes from the leaf upward
/// through its ancestors; the first level that yields a candidate stops the
/// walk for that leaf (closest enclosing state wins). Candidates reached
/// through different leaves are independent and all kept, deduplicated by
/// transition index.
///
/// Returns indices into [`Statechart::transitions`].
pub(super) fn select_transitions<E: Evaluator>(
    chart: &Statechart,
    configuration: &BTreeSet<String>,
    evaluator: &mut E,
    event: Option<&Event>,
) -> Result<Vec<usize>, ExecutionError> {
    let mut selected: Vec<usize> = Vec::new();

    for leaf in chart.leaf_for(configuration) {
        let mut chain = vec![leaf.clone()];
        chain.extend(chart.ancestors_for(&leaf));

        for level in &chain {
            let mut found = false;
            for (index, transition) in chart.transitions_from(level) {
                if transition.event.as_deref() != event.map(|e| e.name.as_str()) {
                    continue;
                }
                if !configuration.contains(&transition.source) {
                    continue;
                }
                let enabled = match &transition.guard {
                    None => true,
                    Some(guard) => evaluator.evaluate_condition(guard, event).map_err(|e| {
                        ExecutionError::Guard {
                            guard: guard.clone(),
                            transition: transition.to_string(),
                            source: e,
                        }
                    })?,
                };
                if enabled {
                    found = true;
                    if !selected.contains(&index) {
                        selected.push(index);
                    }
                }
            }
            // Do not consider the level's parent once a candidate exists.
            if found {
                break;
            }
        }
    }

    Ok(selected)
}
