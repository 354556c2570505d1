//! Error types for the malgraph-ged crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for edit distance approximation.
#[derive(Debug)]
pub struct GedError {
    kind: GedErrorKind,
    backtrace: Backtrace,
}

#[derive(Debug)]
pub(crate) enum GedErrorKind {
    /// The generator yielded no estimate within the cap.
    NoEstimate { max_estimates: usize },
}

impl GedError {
    pub(crate) fn no_estimate(max_estimates: usize) -> Self {
        Self {
            kind: GedErrorKind::NoEstimate { max_estimates },
            backtrace: Backtrace::capture(),
        }
    }

    /// Returns true if no estimate was produced.
    pub fn is_no_estimate(&self) -> bool {
        matches!(self.kind, GedErrorKind::NoEstimate { .. })
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for GedErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GedErrorKind::NoEstimate { max_estimates } => write!(
                f,
                "no edit distance estimate produced (cap: {max_estimates})"
            ),
        }
    }
}

impl fmt::Display for GedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for GedError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_estimate() {
        let err = GedError::no_estimate(10);
        assert!(err.is_no_estimate());
        assert!(err.to_string().contains("cap: 10"));
        let _ = err.backtrace();
    }

    #[test]
    fn test_debug_impl() {
        let debug_str = format!("{:?}", GedError::no_estimate(1));
        assert!(debug_str.contains("GedError"));
    }
}
