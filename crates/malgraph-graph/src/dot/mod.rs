//! Reading Graphviz DOT files.
//!
//! radare2 emits call graphs as DOT text. This module parses the subset of
//! the DOT language those files use (and the rest of the grammar besides),
//! keeping node statements and edges. Attributes are parsed and dropped.
//!
//! ## Node order
//!
//! [`DotGraph::nodes`] lists nodes declared by node statements in order of
//! appearance, followed by nodes that only appear as edge endpoints, in the
//! order their edges appear. This is the order indices are assigned in when
//! the graph is encoded.

mod error;
mod lexer;
mod parser;

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexSet;
use tracing::debug;

pub use self::error::DotError;
use self::error::DotErrorKind;
use self::parser::Parser;
use crate::{EdgeGraph, GraphError};

/// An edge between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DotEdge {
    pub from: String,
    pub to: String,
}

/// One parsed DOT graph with subgraphs flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotGraph {
    pub(crate) name: Option<String>,
    pub(crate) strict: bool,
    pub(crate) directed: bool,
    pub(crate) nodes: IndexSet<String>,
    pub(crate) edges: Vec<DotEdge>,
}

impl DotGraph {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Returns every node: declared nodes first, then edge-only endpoints.
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes: IndexSet<&str> =
            self.nodes.iter().map(String::as_str).collect();
        for edge in &self.edges {
            nodes.insert(&edge.from);
            nodes.insert(&edge.to);
        }
        nodes.into_iter().collect()
    }

    pub fn edges(&self) -> &[DotEdge] {
        &self.edges
    }

    /// Encodes the graph over dense first-seen indices.
    ///
    /// Strict graphs keep only the first of any duplicate edges; for an
    /// undirected strict graph `a -- b` and `b -- a` are duplicates.
    pub fn to_edge_graph(&self) -> Result<EdgeGraph, GraphError> {
        let mut seen = HashSet::new();
        let edges = self.edges.iter().filter(|edge| {
            if !self.strict {
                return true;
            }
            let (from, to) = (edge.from.as_str(), edge.to.as_str());
            let key = if self.directed || from <= to {
                (from, to)
            } else {
                (to, from)
            };
            seen.insert(key)
        });

        EdgeGraph::from_labelled(
            self.nodes.iter().map(String::as_str),
            edges.map(|edge| (edge.from.as_str(), edge.to.as_str())),
        )
    }
}

/// Parses every graph in `input`.
fn parse_dot_all(input: &str) -> Result<Vec<DotGraph>, DotError> {
    let mut parser = Parser::new(lexer::tokenize(input)?);
    let mut graphs = Vec::new();
    while !parser.at_end() {
        graphs.push(parser.parse_graph()?);
    }
    Ok(graphs)
}

/// Parses `input` and returns its first graph.
///
/// Later graphs must still be well formed. An input with no graph is an
/// error.
pub fn parse_dot(input: &str) -> Result<DotGraph, DotError> {
    let graphs = parse_dot_all(input)?;
    if graphs.len() > 1 {
        debug!(count = graphs.len(), "using the first of several graphs");
    }
    graphs
        .into_iter()
        .next()
        .ok_or_else(|| DotError::new(DotErrorKind::Empty))
}

/// Reads and parses the first graph of a DOT file.
pub fn parse_dot_file(path: impl AsRef<Path>) -> Result<DotGraph, DotError> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|err| {
        DotError::new(DotErrorKind::Io {
            path: path.to_path_buf(),
            err,
        })
    })?;
    parse_dot(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shape of `agCd` output from radare2.
    const RADARE2_CALL_GRAPH: &str = r##"digraph code {
rankdir=LR;
outputorder=edgesfirst;
graph [bgcolor=azure fontname="Courier" splines="curved"];
node [fillcolor=white style=filled fontname="Courier New Bold" fontsize=14 shape=box];
edge [arrowhead="normal" style=bold weight=2];
  "0x00001040" [label="entry0" URL="entry0/0x00001040"];
  "0x00001040" -> "0x00001070" [color="#61afef" URL="sym.imp.__libc_start_main/0x00001070"];
  "0x00001139" [label="main" URL="main/0x00001139"];
  "0x00001139" -> "0x00001030" [color="#61afef" URL="sym.imp.puts/0x00001030"];
  "0x00001139" -> "0x00001030" [color="#61afef" URL="sym.imp.puts/0x00001030"];
}
"##;

    #[test]
    fn node_name_ending_in_backslash() {
        let graph = parse_dot(r#"digraph { "a\\" -> "b" [label="x"]; }"#).unwrap();

        assert_eq!(graph.nodes(), vec![r"a\\", "b"]);
        assert_eq!(graph.to_edge_graph().unwrap().edge_list(), vec![[0, 1]]);
    }

    #[test]
    fn parses_radare2_call_graph() {
        let graph = parse_dot(RADARE2_CALL_GRAPH).unwrap();

        assert!(graph.is_directed());
        assert!(!graph.is_strict());
        assert_eq!(graph.name(), Some("code"));
        assert_eq!(
            graph.nodes(),
            vec!["0x00001040", "0x00001139", "0x00001070", "0x00001030"]
        );
        assert_eq!(graph.edges().len(), 3);

        let encoded = graph.to_edge_graph().unwrap();
        assert_eq!(encoded.edge_list(), vec![[0, 2], [1, 3], [1, 3]]);
        assert_eq!(
            encoded.in_out_labels(),
            vec![[0, 1], [0, 2], [1, 0], [2, 0]]
        );
    }

    #[test]
    fn edge_chains_and_subgraphs() {
        let graph =
            parse_dot("digraph { a -> { b; c } -> d; subgraph s { e } }")
                .unwrap();
        let edges: Vec<_> = graph
            .edges()
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(edges, [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        assert_eq!(graph.nodes(), ["b", "c", "e", "a", "d"]);
    }

    #[test]
    fn ports_are_dropped() {
        let graph = parse_dot("digraph { a:p1:n -> b:s }").unwrap();
        assert_eq!(graph.nodes(), ["a", "b"]);
    }

    #[test]
    fn strict_graphs_drop_duplicates() {
        let graph =
            parse_dot("strict graph { a -- b; b -- a; a -- b; b -- c }")
                .unwrap();
        assert!(graph.is_strict());
        let encoded = graph.to_edge_graph().unwrap();
        assert_eq!(encoded.edge_list(), vec![[0, 1], [1, 2]]);
    }

    #[test]
    fn wrong_edge_operator() {
        let err = parse_dot("graph { a -> b }").unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(err.position(), Some((1, 11)));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let graph = parse_dot("DiGraph G { Node [shape=box]; x -> y }").unwrap();
        assert_eq!(graph.nodes(), ["x", "y"]);
    }

    #[test]
    fn first_graph_wins() {
        let graph = parse_dot("digraph one { a } digraph two { b }").unwrap();
        assert_eq!(graph.name(), Some("one"));
        assert_eq!(parse_dot_all("graph { } graph { }").unwrap().len(), 2);
    }

    #[test]
    fn empty_input() {
        let err = parse_dot("  // nothing here\n").unwrap_err();
        assert!(err.is_empty());
    }

    #[test]
    fn missing_brace() {
        let err = parse_dot("digraph { a -> b").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().contains("found end of input"));
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.dot");
        std::fs::write(&path, RADARE2_CALL_GRAPH).unwrap();

        let graph = parse_dot_file(&path).unwrap();
        assert_eq!(graph.nodes().len(), 4);

        let err = parse_dot_file(dir.path().join("missing.dot")).unwrap_err();
        assert!(err.is_io());
    }
}
