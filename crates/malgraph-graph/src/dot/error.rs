//! Error type for DOT parsing.

use std::backtrace::Backtrace;
use std::fmt;
use std::path::PathBuf;

/// Error type for reading DOT graphs.
///
/// Syntax errors carry the 1-based line and column of the offending input.
#[derive(Debug)]
pub struct DotError {
    kind: DotErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum DotErrorKind {
    /// The input is not valid DOT.
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    /// The input contains no graph at all.
    Empty,
    /// Failed to read the DOT file.
    Io { path: PathBuf, err: std::io::Error },
}

impl DotError {
    pub(crate) fn new(kind: DotErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    pub(crate) fn syntax(
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::new(DotErrorKind::Syntax {
            line,
            column,
            message: message.into(),
        })
    }

    /// Returns true if the input was not valid DOT.
    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, DotErrorKind::Syntax { .. })
    }

    /// Returns true if the input held no graph.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, DotErrorKind::Empty)
    }

    /// Returns true if the DOT file could not be read.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, DotErrorKind::Io { .. })
    }

    /// Returns `(line, column)` of a syntax error.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self.kind {
            DotErrorKind::Syntax { line, column, .. } => Some((line, column)),
            _ => None,
        }
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for DotErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DotErrorKind::Syntax {
                line,
                column,
                message,
            } => write!(f, "DOT syntax error at {line}:{column}: {message}"),
            DotErrorKind::Empty => write!(f, "input contains no DOT graph"),
            DotErrorKind::Io { path, err } => {
                write!(f, "failed to read {}: {err}", path.display())
            }
        }
    }
}

impl fmt::Display for DotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for DotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            DotErrorKind::Io { err, .. } => Some(err),
            DotErrorKind::Syntax { .. } | DotErrorKind::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_syntax() {
        let err = DotError::syntax(3, 14, "expected `{`");

        assert!(err.is_syntax());
        assert!(!err.is_io());
        assert!(!err.is_empty());
        assert_eq!(err.position(), Some((3, 14)));
        assert!(err.to_string().contains("3:14: expected `{`"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_io() {
        let err = DotError::new(DotErrorKind::Io {
            path: PathBuf::from("cfg.dot"),
            err: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });

        assert!(err.is_io());
        assert_eq!(err.position(), None);
        assert!(err.to_string().contains("failed to read cfg.dot"));
        assert!(err.source().is_some());
    }
}
