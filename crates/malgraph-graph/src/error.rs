//! Error types for the malgraph-graph crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for graph construction.
///
/// Uses the canonical struct pattern with backtrace capture and `is_xxx()`
/// helper methods.
#[derive(Debug)]
pub struct GraphError {
    kind: GraphErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum GraphErrorKind {
    /// An edge endpoint is not a node of the graph.
    VertexOutOfRange { vertex: u32, node_count: u32 },
    /// The graph has more vertices than fit in a `u32` index.
    TooManyVertices,
}

impl GraphError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: GraphErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    pub(crate) fn vertex_out_of_range(vertex: u32, node_count: u32) -> Self {
        Self::new(GraphErrorKind::VertexOutOfRange { vertex, node_count })
    }

    pub(crate) fn too_many_vertices() -> Self {
        Self::new(GraphErrorKind::TooManyVertices)
    }

    /// Returns true if an edge referenced a vertex outside the graph.
    pub fn is_vertex_out_of_range(&self) -> bool {
        matches!(self.kind, GraphErrorKind::VertexOutOfRange { .. })
    }

    /// Returns true if the graph exceeded the `u32` index space.
    pub fn is_too_many_vertices(&self) -> bool {
        matches!(self.kind, GraphErrorKind::TooManyVertices)
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for GraphErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphErrorKind::VertexOutOfRange { vertex, node_count } => {
                write!(
                    f,
                    "vertex {vertex} is out of range for a graph with {node_count} nodes"
                )
            }
            GraphErrorKind::TooManyVertices => {
                write!(f, "graph has more than {} vertices", u32::MAX)
            }
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for GraphError {}
