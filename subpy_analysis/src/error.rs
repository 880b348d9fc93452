//! Errors surfaced by an analysis run.

use crate::feature::Feature;
use std::fmt;
use subpy_core::SubpyError;
use thiserror::Error;

/// A disallowed feature at one source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The offending feature.
    pub feature: Feature,
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column.
    pub column: usize,
    /// Full text of the offending line.
    pub source_line: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.feature, self.line, self.column
        )
    }
}

/// An import the library allow-list rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    /// Dotted name that failed to match.
    pub library: String,
    /// 1-indexed line of the import statement.
    pub line: usize,
    /// 1-indexed column of the import statement.
    pub column: usize,
    /// Full text of the import line.
    pub source_line: String,
}

impl fmt::Display for ImportSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' imported at line {}, column {}",
            self.library, self.line, self.column
        )
    }
}

/// Analysis failure.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// The source did not lex or parse.
    #[error(transparent)]
    Parse(#[from] SubpyError),

    /// A validator met a feature outside the allowed set.
    #[error("feature not supported: {0}")]
    FeatureNotSupported(Violation),

    /// An import is outside the library allow-list.
    #[error("library not supported: {0}")]
    LibraryNotSupported(ImportSite),

    /// The walker reached a construct it has no rule for.
    #[error("unhandled construct {construct} at line {line}, column {column}")]
    UnhandledConstruct {
        /// Construct tag.
        construct: &'static str,
        /// 1-indexed line.
        line: usize,
        /// 1-indexed column.
        column: usize,
    },

    /// A library allow-list entry did not compile.
    #[error("invalid library pattern: {0}")]
    InvalidLibraryPattern(String),
}

impl AnalysisError {
    /// The violation carried by a `FeatureNotSupported` error.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::FeatureNotSupported(violation) => Some(violation),
            _ => None,
        }
    }

    /// True for errors that reflect a defect in the analyser rather than in
    /// the analysed program or the caller's input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::UnhandledConstruct { .. })
    }
}

/// Result alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;
    use subpy_core::Span;

    fn violation() -> Violation {
        Violation {
            feature: Feature::Lambda,
            line: 3,
            column: 5,
            source_line: "f = lambda: 1".to_string(),
        }
    }

    #[test]
    fn test_violation_display() {
        let err = AnalysisError::FeatureNotSupported(violation());
        assert_eq!(
            err.to_string(),
            "feature not supported: Lambda at line 3, column 5"
        );
        assert_eq!(err.violation(), Some(&violation()));
        assert!(!err.is_internal());
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err: AnalysisError = SubpyError::syntax("expected ':'", Span::new(0, 1)).into();
        assert_eq!(err.to_string(), "syntax error: expected ':'");
        assert!(err.violation().is_none());
    }

    #[test]
    fn test_library_error_display() {
        let err = AnalysisError::LibraryNotSupported(ImportSite {
            library: "os.path".to_string(),
            line: 1,
            column: 1,
            source_line: "import os.path".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "library not supported: 'os.path' imported at line 1, column 1"
        );
    }

    #[test]
    fn test_unhandled_is_internal() {
        let err = AnalysisError::UnhandledConstruct {
            construct: "Slice",
            line: 1,
            column: 2,
        };
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "unhandled construct Slice at line 1, column 2");
    }
}
