//! Graph-pair samples labelled with an approximate graph edit distance.
//!
//! One `GedSample` is written per file. The field names match the SimGNN
//! training data layout: two edge lists, one degree label per node for each
//! graph, and the distance between them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Edge;

/// A pair of graphs and the approximate edit distance between them.
///
/// Node indices in `graph_1` and `graph_2` are dense and zero-based. The
/// label lists hold each node's total degree (incoming plus outgoing edges),
/// one entry per node in index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GedSample {
    /// Edges of the first graph as `[source, target]` pairs.
    pub graph_1: Vec<Edge>,

    /// Edges of the second graph as `[source, target]` pairs.
    pub graph_2: Vec<Edge>,

    /// Total degree of every node in the first graph.
    pub labels_1: Vec<u32>,

    /// Total degree of every node in the second graph.
    pub labels_2: Vec<u32>,

    /// Approximate graph edit distance. This is the last (best) upper bound
    /// observed before the estimate cap was reached.
    pub ged: u64,
}

impl GedSample {
    /// Serializes the sample to a compact JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
