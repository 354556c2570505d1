//! Shared proptest strategies for schema tests.

use proptest::collection::vec;
use proptest::prelude::*;

use crate::Edge;

/// Strategy for generating an edge list over `0..max_node`.
pub fn arb_edges(max_node: u32) -> impl Strategy<Value = Vec<Edge>> {
    vec((0..max_node, 0..max_node).prop_map(|(a, b)| [a, b]), 0..32)
}

/// Strategy for generating small degree labels.
pub fn arb_labels() -> impl Strategy<Value = Vec<u32>> {
    vec(0..64u32, 0..32)
}
