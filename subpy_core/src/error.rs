//! Front-end errors produced while turning source text into a tree.

use crate::span::Span;
use thiserror::Error;

/// Lexing or parsing failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubpyError {
    /// The lexer met a character sequence it cannot tokenize.
    #[error("lex error: {message}")]
    LexError {
        /// Human-readable description.
        message: String,
        /// Offending source range.
        span: Span,
    },
    /// The token stream does not form a valid program.
    #[error("syntax error: {message}")]
    SyntaxError {
        /// Human-readable description.
        message: String,
        /// Offending source range.
        span: Span,
    },
}

impl SubpyError {
    /// Create a lex error.
    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        Self::LexError {
            message: message.into(),
            span,
        }
    }

    /// Create a syntax error.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    /// Source range the error points at.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::LexError { span, .. } | Self::SyntaxError { span, .. } => *span,
        }
    }

    /// The bare message, without the error-kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::LexError { message, .. } | Self::SyntaxError { message, .. } => message,
        }
    }
}

/// Result alias for front-end operations.
pub type SubpyResult<T> = Result<T, SubpyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SubpyError::syntax("expected ':'", Span::new(3, 4));
        assert_eq!(err.to_string(), "syntax error: expected ':'");
        assert_eq!(err.span(), Span::new(3, 4));
        assert_eq!(err.message(), "expected ':'");
    }

    #[test]
    fn test_lex_error_display() {
        let err = SubpyError::lex("unexpected character '$'", Span::new(1, 2));
        assert!(err.to_string().starts_with("lex error"));
    }
}
