//! Call-graph features extracted from a single binary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Edge;

/// A directed graph in the edge-list form graph learning libraries accept.
///
/// `labels[i]` is `[in_degree, out_degree]` of node `i`, so `labels` always
/// has `num_nodes` entries.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(deny_unknown_fields)]
pub struct GeometricData {
    /// Edges as `[source, target]` pairs over `0..num_nodes`.
    pub edgelist: Vec<Edge>,

    /// `[in_degree, out_degree]` for each node, in index order.
    pub labels: Vec<[u32; 2]>,

    /// Number of nodes, including isolated ones.
    pub num_nodes: u32,
}

impl GeometricData {
    /// Serializes the graph to a compact JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The features used to train the classifier for one binary.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(deny_unknown_fields)]
pub struct Features {
    /// The binary's global call graph.
    pub call_graph: GeometricData,

    /// Number of `syscall` and `svc` instructions found in the binary.
    pub num_syscalls: u64,
}

impl Features {
    /// Serializes the features to a compact JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
