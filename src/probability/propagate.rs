//! Recursive weight-to-percentage propagation over a SubSpawn tree.
//!
//! Each sibling list is normalized by its total weight; a node's explicit
//! `Probability` bypasses normalization. Items of a node form one combination.
//! Nested lists inherit the node's effective probability as their parent.

use log::warn;

use crate::probability::amounts::{AmountRecord, OutputOptions, Propagation};
use crate::probability::rounding::round2;
use crate::table::SpawnNode;

/// Weight counted for a node without `Weight` when summing siblings.
pub const WEIGHT_DENOMINATOR_DEFAULT: f64 = 0.0;
/// Weight used as a node's own numerator when it has neither `Weight` nor `Probability`.
pub const WEIGHT_NUMERATOR_DEFAULT: f64 = 1.0;

/// SubSpawn lists nested deeper than this below the slot are not descended.
pub const MAX_SPAWN_DEPTH: usize = 64;

/// Sum of sibling weights, clamped to 1 when it is zero.
pub fn total_weight(nodes: &[SpawnNode]) -> f64 {
    let total: f64 = nodes
        .iter()
        .map(|node| node.weight.unwrap_or(WEIGHT_DENOMINATOR_DEFAULT))
        .sum();
    if total == 0.0 {
        1.0
    } else {
        total
    }
}

pub fn effective_probability(node: &SpawnNode, total_weight: f64, parent_probability: f64) -> f64 {
    match node.probability {
        Some(probability) => probability * parent_probability,
        None => {
            node.weight.unwrap_or(WEIGHT_NUMERATOR_DEFAULT) / total_weight * parent_probability
        }
    }
}

/// Convert a sibling list into per-combination percentages (0..=100 scale for
/// `parent_probability == 1`) and amount records.
pub fn propagate(nodes: &[SpawnNode], parent_probability: f64, options: OutputOptions) -> Propagation {
    propagate_at_depth(nodes, parent_probability, options, 0)
}

fn propagate_at_depth(
    nodes: &[SpawnNode],
    parent_probability: f64,
    options: OutputOptions,
    depth: usize,
) -> Propagation {
    let mut result = Propagation::default();
    let total = total_weight(nodes);

    for node in nodes {
        let probability = effective_probability(node, total, parent_probability);

        let items = node.items();
        if !items.is_empty() {
            let (key, amounts) = AmountRecord::from_items(items, options);
            result.record(key, round2(probability * 100.0), amounts);
        }

        let children = node.sub_spawn();
        if children.is_empty() {
            continue;
        }
        if depth >= MAX_SPAWN_DEPTH {
            warn!(
                "SubSpawn nesting exceeds {MAX_SPAWN_DEPTH} levels; skipping {} nested node(s)",
                children.len()
            );
            continue;
        }
        let nested = propagate_at_depth(children, probability, options, depth + 1);
        result.absorb(nested, round2);
    }

    result
}

#[cfg(test)]
mod tests {
    use crate::table::{Category, ItemEntry};

    use super::*;

    fn leaf(name: &str, weight: Option<f64>) -> SpawnNode {
        SpawnNode {
            weight,
            probability: None,
            category: Some(Category {
                items: Some(vec![ItemEntry {
                    shortname: Some(name.to_string()),
                    ..ItemEntry::default()
                }]),
                sub_spawn: None,
            }),
        }
    }

    fn chain(depth: usize) -> SpawnNode {
        let mut node = leaf("bottom", Some(1.0));
        for _ in 0..depth {
            node = SpawnNode {
                weight: Some(1.0),
                probability: None,
                category: Some(Category {
                    items: None,
                    sub_spawn: Some(vec![node]),
                }),
            };
        }
        node
    }

    #[test]
    fn total_weight_clamps_zero_to_one() {
        assert_eq!(total_weight(&[]), 1.0);
        assert_eq!(total_weight(&[leaf("a", Some(0.0)), leaf("b", None)]), 1.0);
        assert_eq!(total_weight(&[leaf("a", Some(3.0)), leaf("b", Some(1.0))]), 4.0);
    }

    #[test]
    fn explicit_probability_overrides_weight() {
        let mut node = leaf("a", Some(100.0));
        node.probability = Some(0.25);
        assert_eq!(effective_probability(&node, 200.0, 0.5), 0.125);
    }

    #[test]
    fn absent_weight_uses_distinct_numerator_and_denominator_defaults() {
        // Unweighted node adds 0 to the total but counts 1 for itself.
        let nodes = vec![leaf("unweighted", None), leaf("weighted", Some(1.0))];
        let total = total_weight(&nodes);
        assert_eq!(total, 1.0);
        assert_eq!(effective_probability(&nodes[0], total, 1.0), 1.0);
        assert_eq!(effective_probability(&nodes[1], total, 1.0), 1.0);

        let result = propagate(&nodes, 1.0, OutputOptions::default());
        assert_eq!(result.percentages["unweighted"], 100.0);
        assert_eq!(result.percentages["weighted"], 100.0);
    }

    #[test]
    fn chains_within_depth_limit_are_fully_descended() {
        let result = propagate(&[chain(10)], 1.0, OutputOptions::default());
        assert_eq!(result.percentages["bottom"], 100.0);
    }

    #[test]
    fn chains_beyond_depth_limit_are_cut_off() {
        let result = propagate(&[chain(MAX_SPAWN_DEPTH + 5)], 1.0, OutputOptions::default());
        assert!(result.is_empty());
    }
}
