//! Graph encoding primitives shared by the malgraph pipelines.
//!
//! Graphs arrive with arbitrary vertex identifiers (integers from a dataset,
//! quoted addresses from a DOT file). This crate renumbers them into a dense
//! zero-based range and flattens them into the edge-list and degree-label
//! form the JSON records carry.
//!
//! ## Index assignment
//!
//! [`VertexMap`] assigns indices in first-encounter order over whatever
//! iteration of vertices it is given. There is no canonical ordering: the
//! same graph listed in a different order gets different indices, and a map
//! built for one graph means nothing for another.
//!
//! ## Usage
//!
//! ```
//! use malgraph_graph::EdgeGraph;
//!
//! let graph = EdgeGraph::from_labelled(["a", "b"], [("a", "b"), ("c", "a")]).unwrap();
//! assert_eq!(graph.edge_list(), vec![[0, 1], [2, 0]]);
//! assert_eq!(graph.degree_labels(), vec![2, 1, 1]);
//! assert_eq!(graph.in_out_labels(), vec![[1, 1], [1, 0], [0, 1]]);
//! ```

pub mod dot;
mod edge_graph;
mod error;
mod vertex_map;

#[doc(inline)]
pub use crate::edge_graph::EdgeGraph;
#[doc(inline)]
pub use crate::error::GraphError;
#[doc(inline)]
pub use crate::vertex_map::VertexMap;
