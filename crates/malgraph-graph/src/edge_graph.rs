//! Directed multigraphs over dense node indices.

use std::hash::Hash;

use malgraph_schemas::{Edge, GeometricData};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::GraphError;
use crate::vertex_map::VertexMap;

/// A directed graph whose nodes are `0..node_count()`.
///
/// Parallel edges and self loops are kept. Edges remember the order they were
/// added in, and [`edge_list`](Self::edge_list) reports them in that order.
#[derive(Debug, Clone, Default)]
pub struct EdgeGraph {
    graph: DiGraph<(), ()>,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "DiGraph uses the default u32 index type"
)]
fn dense(index: NodeIndex) -> u32 {
    index.index() as u32
}

impl EdgeGraph {
    /// Creates a graph with `node_count` isolated nodes.
    pub fn with_nodes(node_count: u32) -> Self {
        let mut graph = DiGraph::with_capacity(node_count as usize, 0);
        for _ in 0..node_count {
            graph.add_node(());
        }
        Self { graph }
    }

    /// Builds a graph from original vertex identifiers.
    ///
    /// Nodes are numbered in first-seen order over `nodes` followed by the
    /// endpoints of `edges`, so an edge may mention a vertex that `nodes`
    /// does not list. The vertex map is dropped once the graph is built.
    pub fn from_labelled<K: Hash + Eq>(
        nodes: impl IntoIterator<Item = K>,
        edges: impl IntoIterator<Item = (K, K)>,
    ) -> Result<Self, GraphError> {
        let mut map = VertexMap::from_vertices(nodes)?;
        let mut encoded = Vec::new();
        for (from, to) in edges {
            let from = map.insert(from)?;
            let to = map.insert(to)?;
            encoded.push((from, to));
        }

        let node_count = u32::try_from(map.len())
            .map_err(|_| GraphError::too_many_vertices())?;
        let mut graph = Self::with_nodes(node_count);
        for (from, to) in encoded {
            graph.add_edge(from, to)?;
        }
        Ok(graph)
    }

    /// Adds a directed edge. Both endpoints must already be nodes.
    pub fn add_edge(&mut self, from: u32, to: u32) -> Result<(), GraphError> {
        let node_count = self.node_count();
        for vertex in [from, to] {
            if vertex >= node_count {
                return Err(GraphError::vertex_out_of_range(vertex, node_count));
            }
        }
        self.graph
            .add_edge(NodeIndex::new(from as usize), NodeIndex::new(to as usize), ());
        Ok(())
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "DiGraph uses the default u32 index type"
    )]
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over `(source, target)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| (dense(e.source()), dense(e.target())))
    }

    /// Returns the edges as `[source, target]` pairs in insertion order.
    pub fn edge_list(&self) -> Vec<Edge> {
        self.edges().map(|(from, to)| [from, to]).collect()
    }

    /// Returns `[in_degree, out_degree]` for every node.
    ///
    /// Parallel edges count once per edge. A self loop adds one to both the
    /// in-degree and the out-degree of its node.
    pub fn in_out_labels(&self) -> Vec<[u32; 2]> {
        let mut labels = vec![[0u32; 2]; self.graph.node_count()];
        for (from, to) in self.edges() {
            labels[from as usize][1] += 1;
            labels[to as usize][0] += 1;
        }
        labels
    }

    /// Returns the total degree (in plus out) of every node.
    pub fn degree_labels(&self) -> Vec<u32> {
        self.in_out_labels()
            .into_iter()
            .map(|[incoming, outgoing]| incoming + outgoing)
            .collect()
    }

    /// Flattens the graph into the record used for call-graph features.
    pub fn to_geometric(&self) -> GeometricData {
        GeometricData {
            edgelist: self.edge_list(),
            labels: self.in_out_labels(),
            num_nodes: self.node_count(),
        }
    }
}
