//! Turning analysis output into feature records.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use malgraph_graph::dot::parse_dot;
use malgraph_schemas::{Features, GeometricData};
use tracing::{info, info_span, instrument};

use crate::analyzer::BinaryAnalyzer;
use crate::error::FeaturesError;

/// Encodes a DOT graph as edge list and `[in_degree, out_degree]` labels.
///
/// Only the first graph of `dot` is used. Vertices are numbered in the
/// order the graph declares them, then in order of first appearance in an
/// edge.
pub fn dot_to_geometric(dot: &str) -> Result<GeometricData, FeaturesError> {
    let graph = parse_dot(dot)?.to_edge_graph()?;
    Ok(graph.to_geometric())
}

/// Analyses one binary and builds its feature record.
#[instrument(skip(analyzer))]
pub fn file_to_features<A: BinaryAnalyzer + ?Sized>(
    analyzer: &A,
    path: &Path,
) -> Result<Features, FeaturesError> {
    let analysis = analyzer.analyze(path)?;
    let call_graph = dot_to_geometric(&analysis.call_graph_dot)?;
    Ok(Features {
        call_graph,
        num_syscalls: analysis.num_syscalls() as u64,
    })
}

/// Extracts features from each binary in turn and writes the records to
/// `out_dir/0`, `out_dir/1`, ... in input order.
///
/// Stops at the first binary that fails. Returns the written paths.
pub fn extract_all<A, P>(
    analyzer: &A,
    inputs: &[P],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, FeaturesError>
where
    A: BinaryAnalyzer + ?Sized,
    P: AsRef<Path>,
{
    fs::create_dir_all(out_dir).map_err(|err| FeaturesError::io(out_dir, err))?;

    let mut written = Vec::with_capacity(inputs.len());
    for (idx, input) in inputs.iter().enumerate() {
        let input = input.as_ref();
        let _span = info_span!("binary", idx, path = %input.display()).entered();

        let features = file_to_features(analyzer, input)?;
        let out = out_dir.join(idx.to_string());
        write_features(&out, &features)?;
        info!(
            nodes = features.call_graph.num_nodes,
            edges = features.call_graph.edgelist.len(),
            syscalls = features.num_syscalls,
            "wrote features"
        );
        written.push(out);
    }
    Ok(written)
}

fn write_features(path: &Path, features: &Features) -> Result<(), FeaturesError> {
    let file = File::create(path).map_err(|err| FeaturesError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, features)?;
    writer.flush().map_err(|err| FeaturesError::io(path, err))
}
