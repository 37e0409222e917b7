//! Conflict detection and deterministic ordering of transition sets.

use super::error::ExecutionError;
use crate::core::{State, Statechart};

/// Validate that a simultaneously-firing transition set is conflict-free
/// and put it into its deterministic firing order.
///
/// For every pair, the least common ancestor of the two sources must be an
/// orthogonal state; otherwise the same exclusive branch was activated two
/// different ways and the set is non-deterministic. Each transition with a
/// target must also keep that target inside its own child branch of that
/// ancestor; a target outside it escapes the region and conflicts with the
/// sibling region's transition. Internal transitions have no target and
/// cannot escape.
///
/// The order itself is the composite rule: sort by source name descending,
/// stable-sort by source depth ascending, then reverse. Deeper-sourced
/// transitions fire first and the name component makes the order total
/// without semantic priorities.
pub(super) fn order_transitions(
    chart: &Statechart,
    mut selected: Vec<usize>,
) -> Result<Vec<usize>, ExecutionError> {
    if selected.len() < 2 {
        return Ok(selected);
    }

    for i in 0..selected.len() {
        for j in (i + 1)..selected.len() {
            let t1 = &chart.transitions()[selected[i]];
            let t2 = &chart.transitions()[selected[j]];

            let lca = chart.least_common_ancestor(&t1.source, &t2.source);
            let orthogonal = lca
                .as_deref()
                .and_then(|name| chart.state(name))
                .is_some_and(|state| matches!(state, State::Orthogonal { .. }));
            if !orthogonal {
                return Err(ExecutionError::NonDeterminism {
                    first: t1.to_string(),
                    second: t2.to_string(),
                });
            }

            // The escape check is against the LCA, not the direct parents:
            // the two sources may come from nested parallel regions.
            for transition in [t1, t2] {
                let Some(target) = &transition.target else {
                    continue;
                };
                let branch = chart.branch_root(&transition.source, lca.as_deref());
                if *target != branch && !chart.descendants_for(&branch).contains(target) {
                    return Err(ExecutionError::Conflict {
                        first: t1.to_string(),
                        second: t2.to_string(),
                    });
                }
            }
        }
    }

    selected.sort_by(|a, b| {
        chart.transitions()[*b]
            .source
            .cmp(&chart.transitions()[*a].source)
    });
    selected.sort_by_key(|index| chart.depth_of(&chart.transitions()[*index].source));
    selected.reverse();

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StatechartBuilder, TransitionBuilder};

    // par (orthogonal)
    // ├── r1 (compound) ── r1a, r1b
    // └── r2 (compound) ── r2a, r2b
    fn parallel_chart(extra: Vec<crate::core::Transition>) -> Statechart {
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
            .unwrap()
    }

    #[test]
    fn single_transition_passes_through() {
        let chart = parallel_chart(vec![TransitionBuilder::from("r1a")
            .to("r1b")
            .on("go")
            .build()]);
        assert_eq!(order_transitions(&chart, vec![0]).unwrap(), vec![0]);
    }

    #[test]
    fn same_region_pairs_are_non_deterministic() {
        let chart = parallel_chart(vec![
            TransitionBuilder::from("r1a").to("r1b").on("go").build(),
            TransitionBuilder::from("r1a").to("r1a").on("go").build(),
        ]);
        let result = order_transitions(&chart, vec![0, 1]);
        assert!(matches!(result, Err(ExecutionError::NonDeterminism { .. })));
    }

    #[test]
    fn escaping_targets_conflict() {
        let chart = parallel_chart(vec![
            TransitionBuilder::from("r1a").to("r2b").on("go").build(),
            TransitionBuilder::from("r2a").to("r2b").on("go").build(),
        ]);
        let result = order_transitions(&chart, vec![0, 1]);
        assert!(matches!(result, Err(ExecutionError::Conflict { .. })));
    }

    #[test]
    fn internal_transitions_cannot_escape() {
        let chart = parallel_chart(vec![
            TransitionBuilder::from("r1a").on("go").action("noop").build(),
            TransitionBuilder::from("r2a").to("r2b").on("go").build(),
        ]);
        let ordered = order_transitions(&chart, vec![0, 1]).unwrap();
        assert_eq!(ordered.len(), 2);
    }

    #[test]
    fn order_is_depth_first_then_reversed_name() {
        // Same depth sources: after the composite rule the order is by
        // ascending source name.
        let chart = parallel_chart(vec![
            TransitionBuilder::from("r2a").to("r2b").on("go").build(),
            TransitionBuilder::from("r1a").to("r1b").on("go").build(),
        ]);
        let ordered = order_transitions(&chart, vec![0, 1]).unwrap();
        let sources: Vec<_> = ordered
            .iter()
            .map(|&i| chart.transitions()[i].source.as_str())
            .collect();
        assert_eq!(sources, ["r1a", "r2a"]);
    }

    #[test]
    fn deeper_sources_fire_first() {
        // Nested parallel: inner region leaf is deeper than the sibling
        // region's direct child.
        let chart = StatechartBuilder::new("nested-parallel")
            .initial("par")
            .state("par", State::orthogonal(["r1", "r2"]))
            .state("r1", State::compound(["inner"], Some("inner")))
            .state("inner", State::compound(["deep"], Some("deep")))
            .state("deep", State::basic())
            .state("r2", State::compound(["shallow"], Some("shallow")))
            .state("shallow", State::basic())
            .transition(TransitionBuilder::from("shallow").on("go").build())
            .transition(TransitionBuilder::from("deep").on("go").build())
            .build()
            .unwrap();
        let ordered = order_transitions(&chart, vec![0, 1]).unwrap();
        let sources: Vec<_> = ordered
            .iter()
            .map(|&i| chart.transitions()[i].source.as_str())
            .collect();
        assert_eq!(sources, ["deep", "shallow"]);
    }
}
