//! Error types for the malgraph-features crate.

use std::backtrace::Backtrace;
use std::fmt;
use std::path::{Path, PathBuf};

use malgraph_graph::GraphError;
use malgraph_graph::dot::DotError;

/// Error type for feature extraction.
///
/// Uses the canonical struct pattern with backtrace capture and `is_xxx()`
/// helper methods.
#[derive(Debug)]
pub struct FeaturesError {
    kind: FeaturesErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum FeaturesErrorKind {
    /// Reading a binary or writing an output file failed.
    Io { path: PathBuf, err: std::io::Error },
    /// The analysis tool could not be run or produced unusable output.
    Tool { program: String, message: String },
    /// The call graph is not valid DOT.
    Dot(DotError),
    /// The call graph could not be encoded.
    Graph(GraphError),
    /// Failed to serialize a feature record.
    Serialization(serde_json::Error),
}

impl FeaturesError {
    pub(crate) fn new(kind: FeaturesErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        Self::new(FeaturesErrorKind::Io {
            path: path.as_ref().to_path_buf(),
            err,
        })
    }

    /// Reports an analysis tool failure. Public so that other
    /// [`BinaryAnalyzer`](crate::BinaryAnalyzer) implementations can use it.
    pub fn tool(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FeaturesErrorKind::Tool {
            program: program.into(),
            message: message.into(),
        })
    }

    /// Returns true if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, FeaturesErrorKind::Io { .. })
    }

    /// Returns true if the analysis tool failed.
    pub fn is_tool(&self) -> bool {
        matches!(self.kind, FeaturesErrorKind::Tool { .. })
    }

    /// Returns true if the call graph failed to parse as DOT.
    pub fn is_dot(&self) -> bool {
        matches!(self.kind, FeaturesErrorKind::Dot(_))
    }

    pub fn is_graph(&self) -> bool {
        matches!(self.kind, FeaturesErrorKind::Graph(_))
    }

    /// Returns true if this is a JSON serialization error.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, FeaturesErrorKind::Serialization(_))
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for FeaturesErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeaturesErrorKind::Io { path, err } => {
                write!(f, "I/O error on {}: {err}", path.display())
            }
            FeaturesErrorKind::Tool { program, message } => {
                write!(f, "{program}: {message}")
            }
            FeaturesErrorKind::Dot(err) => write!(f, "invalid call graph: {err}"),
            FeaturesErrorKind::Graph(err) => {
                write!(f, "failed to encode call graph: {err}")
            }
            FeaturesErrorKind::Serialization(err) => {
                write!(f, "failed to serialize features: {err}")
            }
        }
    }
}

impl fmt::Display for FeaturesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for FeaturesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            FeaturesErrorKind::Io { err, .. } => Some(err),
            FeaturesErrorKind::Dot(err) => Some(err),
            FeaturesErrorKind::Graph(err) => Some(err),
            FeaturesErrorKind::Serialization(err) => Some(err),
            FeaturesErrorKind::Tool { .. } => None,
        }
    }
}

impl From<DotError> for FeaturesError {
    fn from(err: DotError) -> Self {
        Self::new(FeaturesErrorKind::Dot(err))
    }
}

impl From<GraphError> for FeaturesError {
    fn from(err: GraphError) -> Self {
        Self::new(FeaturesErrorKind::Graph(err))
    }
}

impl From<serde_json::Error> for FeaturesError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(FeaturesErrorKind::Serialization(err))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_tool() {
        let err = FeaturesError::tool("r2", "exited with status 1");

        assert!(err.is_tool());
        assert!(!err.is_io());
        assert!(err.source().is_none());
        assert!(err.to_string().starts_with("r2: exited with status 1"));
    }

    #[test]
    fn test_dot_source() {
        let dot = malgraph_graph::dot::parse_dot("digraph {").unwrap_err();
        let err = FeaturesError::from(dot);

        assert!(err.is_dot());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io() {
        let err = FeaturesError::io(
            "bin/sample.dot",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        assert!(err.is_io());
        assert!(err.to_string().contains("bin/sample.dot"));
    }
}
