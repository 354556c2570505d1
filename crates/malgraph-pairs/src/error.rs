//! Error types for the malgraph-pairs crate.

use std::backtrace::Backtrace;
use std::fmt;
use std::path::{Path, PathBuf};

use malgraph_ged::GedError;
use malgraph_graph::GraphError;

/// Error type for graph-pair dataset generation.
///
/// Uses the canonical struct pattern with backtrace capture and `is_xxx()`
/// helper methods.
#[derive(Debug)]
pub struct PairsError {
    kind: PairsErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum PairsErrorKind {
    /// Reading a graph or writing a sample failed.
    Io { path: PathBuf, err: std::io::Error },
    /// The dataset directory does not have the expected layout.
    Dataset(String),
    /// An edge-list file is malformed.
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    /// A graph could not be built.
    Graph(GraphError),
    /// The edit distance generator produced nothing.
    Ged(GedError),
    /// Failed to serialize a sample to JSON.
    Serialization(serde_json::Error),
    /// Samples were requested from a dataset with no graphs.
    EmptyDataset,
}

impl PairsError {
    pub(crate) fn new(kind: PairsErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self::new(PairsErrorKind::Io {
            path: path.as_ref().to_path_buf(),
            err,
        })
    }

    pub(crate) fn dataset(message: impl Into<String>) -> Self {
        Self::new(PairsErrorKind::Dataset(message.into()))
    }

    pub(crate) fn parse(
        path: impl AsRef<Path>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::new(PairsErrorKind::Parse {
            path: path.as_ref().to_path_buf(),
            line,
            message: message.into(),
        })
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, PairsErrorKind::Io { .. })
    }

    /// Returns true if the dataset layout was not recognised.
    pub fn is_dataset(&self) -> bool {
        matches!(self.kind, PairsErrorKind::Dataset(_))
    }

    /// Returns true if an edge-list file was malformed.
    pub fn is_parse(&self) -> bool {
        matches!(self.kind, PairsErrorKind::Parse { .. })
    }

    /// Returns true if a graph could not be built.
    pub fn is_graph(&self) -> bool {
        matches!(self.kind, PairsErrorKind::Graph(_))
    }

    /// Returns true if no edit distance estimate was produced.
    pub fn is_ged(&self) -> bool {
        matches!(self.kind, PairsErrorKind::Ged(_))
    }

    /// Returns true if a sample could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, PairsErrorKind::Serialization(_))
    }

    /// Returns true if samples were requested from an empty dataset.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self.kind, PairsErrorKind::EmptyDataset)
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for PairsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairsErrorKind::Io { path, err } => {
                write!(f, "I/O error on {}: {err}", path.display())
            }
            PairsErrorKind::Dataset(message) => {
                write!(f, "invalid dataset: {message}")
            }
            PairsErrorKind::Parse {
                path,
                line,
                message,
            } => write!(f, "{}:{line}: {message}", path.display()),
            PairsErrorKind::Graph(err) => write!(f, "invalid graph: {err}"),
            PairsErrorKind::Ged(err) => {
                write!(f, "edit distance approximation failed: {err}")
            }
            PairsErrorKind::Serialization(err) => {
                write!(f, "failed to serialize sample: {err}")
            }
            PairsErrorKind::EmptyDataset => {
                write!(f, "cannot sample pairs from an empty dataset")
            }
        }
    }
}

impl fmt::Display for PairsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for PairsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            PairsErrorKind::Io { err, .. } => Some(err),
            PairsErrorKind::Graph(err) => Some(err),
            PairsErrorKind::Ged(err) => Some(err),
            PairsErrorKind::Serialization(err) => Some(err),
            PairsErrorKind::Dataset(_)
            | PairsErrorKind::Parse { .. }
            | PairsErrorKind::EmptyDataset => None,
        }
    }
}

impl From<GraphError> for PairsError {
    fn from(err: GraphError) -> Self {
        Self::new(PairsErrorKind::Graph(err))
    }
}

impl From<GedError> for PairsError {
    fn from(err: GedError) -> Self {
        Self::new(PairsErrorKind::Ged(err))
    }
}

impl From<serde_json::Error> for PairsError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(PairsErrorKind::Serialization(err))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_io() {
        let err = PairsError::io(
            "data/x.edgelist",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );

        assert!(err.is_io());
        assert!(!err.is_parse());
        assert!(err.to_string().contains("data/x.edgelist"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_parse() {
        let err = PairsError::parse("g.edgelist", 7, "expected two node ids");

        assert!(err.is_parse());
        assert!(!err.is_io());
        assert!(err.to_string().contains("g.edgelist:7: expected two node ids"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_serialization_from() {
        let json_err =
            serde_json::from_str::<String>("not valid json").unwrap_err();
        let err = PairsError::from(json_err);

        assert!(err.is_serialization());
        assert!(!err.is_dataset());
        assert!(err.to_string().contains("failed to serialize sample"));
    }

    #[test]
    fn test_empty_dataset() {
        let err = PairsError::new(PairsErrorKind::EmptyDataset);

        assert!(err.is_empty_dataset());
        assert!(!err.is_ged());
        assert!(!err.is_graph());
        let _ = err.backtrace();
    }
}
