//! Reader for the MalNet-Tiny function call graph dataset.
//!
//! The dataset must already be on disk in its published layout:
//!
//! ```text
//! <root>/[raw/]malnet-graphs-tiny/<type>/<family>/<sha256>.edgelist
//! <root>/[raw/]split_info_tiny/type/{train,val,test}.txt
//! ```
//!
//! Each split file lists one graph per line as a path relative to
//! `malnet-graphs-tiny/`, without the `.edgelist` extension. Graphs are
//! read lazily, one file per [`GraphDataset::get`] call.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use malgraph_graph::EdgeGraph;
use tracing::{debug_span, info, warn};
use walkdir::WalkDir;

use crate::dataset::GraphDataset;
use crate::error::PairsError;

const GRAPHS_DIR: &str = "malnet-graphs-tiny";
const SPLITS_DIR: &str = "split_info_tiny/type";
const EXTENSION: &str = "edgelist";

/// One of the published dataset splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = PairsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            other => Err(PairsError::dataset(format!("unknown split `{other}`"))),
        }
    }
}

/// The graphs of one MalNet-Tiny split.
#[derive(Debug, Clone)]
pub struct MalnetTiny {
    files: Vec<PathBuf>,
}

impl MalnetTiny {
    /// Indexes the graphs of `split` under `root`.
    ///
    /// Without a split file every graph in the dataset is used, in sorted
    /// path order.
    pub fn open(root: impl AsRef<Path>, split: Split) -> Result<Self, PairsError> {
        let root = root.as_ref();
        let _span =
            debug_span!("open_malnet", root = %root.display(), %split).entered();

        let base = [root.join("raw"), root.to_path_buf()]
            .into_iter()
            .find(|base| base.join(GRAPHS_DIR).is_dir())
            .ok_or_else(|| {
                PairsError::dataset(format!(
                    "no {GRAPHS_DIR} directory under {}",
                    root.display()
                ))
            })?;
        let graphs_dir = base.join(GRAPHS_DIR);

        let split_file =
            base.join(SPLITS_DIR).join(format!("{}.txt", split.as_str()));
        let files = if split_file.is_file() {
            let listing = fs::read_to_string(&split_file)
                .map_err(|err| PairsError::io(&split_file, err))?;
            listing
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|entry| graphs_dir.join(format!("{entry}.{EXTENSION}")))
                .collect()
        } else {
            warn!(
                split_file = %split_file.display(),
                "split file missing, using every graph"
            );
            all_graphs(&graphs_dir)?
        };

        info!(graphs = files.len(), %split, "indexed MalNet-Tiny split");
        Ok(Self { files })
    }

    /// Paths of the graph files, in dataset index order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

fn all_graphs(graphs_dir: &Path) -> Result<Vec<PathBuf>, PairsError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(graphs_dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(graphs_dir).to_path_buf();
            PairsError::io(path, err.into())
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == EXTENSION)
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

impl GraphDataset for MalnetTiny {
    fn len(&self) -> usize {
        self.files.len()
    }

    fn get(&self, index: usize) -> Result<EdgeGraph, PairsError> {
        let path = self.files.get(index).ok_or_else(|| {
            PairsError::dataset(format!(
                "graph index {index} out of range for {} graphs",
                self.files.len()
            ))
        })?;
        let text =
            fs::read_to_string(path).map_err(|err| PairsError::io(path, err))?;
        parse_edgelist(path, &text)
    }
}

/// Parses a MalNet edge list: one `source target` pair of integer node ids
/// per line, with `#` comment lines.
///
/// Nodes are `0..=max_id`, so ids that never appear in an edge are isolated
/// nodes. Edge order and multiplicity are kept.
pub fn parse_edgelist(
    path: impl AsRef<Path>,
    text: &str,
) -> Result<EdgeGraph, PairsError> {
    let path = path.as_ref();
    let mut edges = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(from), Some(to), None) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(PairsError::parse(path, i + 1, "expected two node ids"));
        };
        let parse = |field: &str| {
            field.parse::<u32>().map_err(|err| {
                PairsError::parse(path, i + 1, format!("bad node id `{field}`: {err}"))
            })
        };
        edges.push((parse(from)?, parse(to)?));
    }

    let node_count = match edges.iter().map(|&(a, b)| a.max(b)).max() {
        Some(max_id) => max_id.checked_add(1).ok_or_else(|| {
            PairsError::parse(path, 0, "node id does not fit in a u32 range")
        })?,
        None => 0,
    };
    let mut graph = EdgeGraph::with_nodes(node_count);
    for (from, to) in edges {
        graph.add_edge(from, to)?;
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "# Directed graph (each unordered pair of nodes is saved once)\n\
        # Function call graph of an APK\n\
        # Nodes: 4 Edges: 3\n\
        # FromNodeId\tToNodeId\n\
        #\n";

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn parses_malnet_edgelist() {
        let text = format!("{HEADER}0\t3\n3 1\n0\t3\n");
        let graph = parse_edgelist("g.edgelist", &text).unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_list(), vec![[0, 3], [3, 1], [0, 3]]);
        assert_eq!(graph.degree_labels(), vec![2, 1, 0, 3]);
    }

    #[test]
    fn empty_edgelist_has_no_nodes() {
        let graph = parse_edgelist("g.edgelist", HEADER).unwrap();
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn malformed_lines_are_reported() {
        let err = parse_edgelist("g.edgelist", "0 1\n2\n").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("g.edgelist:2"));

        let err = parse_edgelist("g.edgelist", "0 x\n").unwrap_err();
        assert!(err.to_string().contains("bad node id `x`"));

        let err = parse_edgelist("g.edgelist", "0 1 2\n").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn split_file_selects_graphs() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let graphs = raw.join(GRAPHS_DIR);
        write(&graphs.join("trojan/hiddad/aa.edgelist"), "0 1\n");
        write(&graphs.join("benign/benign/bb.edgelist"), "0 1\n1 2\n");
        write(
            &raw.join(SPLITS_DIR).join("test.txt"),
            "trojan/hiddad/aa\nbenign/benign/bb\n",
        );

        let dataset = MalnetTiny::open(dir.path(), Split::Test).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(0).unwrap().edge_count(), 1);
        assert_eq!(dataset.get(1).unwrap().edge_count(), 2);
        assert!(dataset.get(2).unwrap_err().is_dataset());
    }

    #[test]
    fn missing_split_file_uses_every_graph() {
        let dir = tempfile::tempdir().unwrap();
        let graphs = dir.path().join(GRAPHS_DIR);
        write(&graphs.join("b/f/2.edgelist"), "0 1\n");
        write(&graphs.join("a/f/1.edgelist"), "0 1\n");
        write(&graphs.join("a/f/notes.txt"), "ignored");

        let dataset = MalnetTiny::open(dir.path(), Split::Train).unwrap();
        let names: Vec<_> = dataset
            .files()
            .iter()
            .map(|p| p.strip_prefix(&graphs).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            [PathBuf::from("a/f/1.edgelist"), PathBuf::from("b/f/2.edgelist")]
        );
    }

    #[test]
    fn missing_listed_graph_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(GRAPHS_DIR)).unwrap();
        write(&dir.path().join(SPLITS_DIR).join("val.txt"), "x/y/z\n");

        let dataset = MalnetTiny::open(dir.path(), Split::Val).unwrap();
        assert!(dataset.get(0).unwrap_err().is_io());
    }

    #[test]
    fn missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = MalnetTiny::open(dir.path(), Split::Train).unwrap_err();
        assert!(err.is_dataset());
    }

    #[test]
    fn split_names() {
        assert_eq!("val".parse::<Split>().unwrap(), Split::Val);
        assert_eq!(Split::Train.to_string(), "train");
        assert!("dev".parse::<Split>().is_err());
    }
}
