//! Token definitions for the lexer.
//!
//! `match`, `case` and `type` are ordinary identifiers in this grammar, and so
//! are the legacy statement words `print` and `exec`; the statement parser
//! recognises the latter by position.
//!
//! Keywords and fixed-text tokens are declared once in tables; the enums,
//! their lookups and their display text are generated from those tables.

use std::fmt;
use subpy_core::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Source span.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    #[inline]
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Check if this is an end-of-file token.
    #[inline]
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Check if this is a newline token.
    #[inline]
    #[must_use]
    pub const fn is_newline(&self) -> bool {
        matches!(self.kind, TokenKind::Newline)
    }
}

// =============================================================================
// Token Kinds
// =============================================================================

macro_rules! token_kinds {
    (
        carrying { $( $(#[$meta:meta])* $data:ident($ty:ty), )* }
        fixed { $( $fixed:ident => $text:literal, )* }
    ) => {
        /// Token kinds for lexical analysis.
        #[derive(Debug, Clone, PartialEq)]
        pub enum TokenKind {
            $( $(#[$meta])* $data($ty), )*
            $( #[doc = concat!("`", $text, "`")] $fixed, )*
        }

        impl TokenKind {
            /// Display text of a token that carries no data.
            #[must_use]
            pub const fn fixed_text(&self) -> Option<&'static str> {
                match self {
                    $( Self::$fixed => Some($text), )*
                    _ => None,
                }
            }
        }
    };
}

token_kinds! {
    carrying {
        /// Integer literal.
        Int(i64),
        /// Integer literal too large for `i64`, kept as written.
        BigInt(String),
        /// Float literal.
        Float(f64),
        /// Imaginary literal (the `j` suffix dropped).
        Complex(f64),
        /// String literal, escapes resolved.
        String(String),
        /// Bytes literal, escapes resolved.
        Bytes(Vec<u8>),
        /// Identifier.
        Ident(String),
        /// Reserved word.
        Keyword(Keyword),
        /// Text the lexer could not tokenize, with the reason.
        Error(String),
    }
    fixed {
        Plus => "+",
        Minus => "-",
        Star => "*",
        DoubleStar => "**",
        Slash => "/",
        DoubleSlash => "//",
        Percent => "%",
        At => "@",
        LeftShift => "<<",
        RightShift => ">>",
        Ampersand => "&",
        Pipe => "|",
        Caret => "^",
        Tilde => "~",
        ColonEqual => ":=",
        Less => "<",
        Greater => ">",
        LessEqual => "<=",
        GreaterEqual => ">=",
        EqualEqual => "==",
        NotEqual => "!=",
        LeftParen => "(",
        RightParen => ")",
        LeftBracket => "[",
        RightBracket => "]",
        LeftBrace => "{",
        RightBrace => "}",
        Comma => ",",
        Colon => ":",
        Dot => ".",
        Semicolon => ";",
        Arrow => "->",
        Equal => "=",
        PlusEqual => "+=",
        MinusEqual => "-=",
        StarEqual => "*=",
        SlashEqual => "/=",
        DoubleSlashEqual => "//=",
        PercentEqual => "%=",
        AtEqual => "@=",
        AmpersandEqual => "&=",
        PipeEqual => "|=",
        CaretEqual => "^=",
        RightShiftEqual => ">>=",
        LeftShiftEqual => "<<=",
        DoubleStarEqual => "**=",
        Ellipsis => "...",
        Indent => "INDENT",
        Dedent => "DEDENT",
        Newline => "NEWLINE",
        Eof => "EOF",
    }
}

impl TokenKind {
    /// Check if this is a comparison operator.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Less
                | Self::Greater
                | Self::LessEqual
                | Self::GreaterEqual
                | Self::EqualEqual
                | Self::NotEqual
        )
    }

    /// Check if this is an augmented assignment operator.
    #[must_use]
    pub fn is_augmented_assign(&self) -> bool {
        match self.fixed_text() {
            Some("==" | "!=" | "<=" | ">=" | ":=") | None => false,
            Some(text) => text.len() >= 2 && text.ends_with('='),
        }
    }

    /// Check if this token can begin the operand of a legacy `print` statement.
    ///
    /// `(` and `[` are excluded so that `print(...)` stays a call and
    /// `print[...]` a subscript.
    #[must_use]
    pub const fn starts_print_operand(&self) -> bool {
        matches!(
            self,
            Self::Int(_)
                | Self::BigInt(_)
                | Self::Float(_)
                | Self::Complex(_)
                | Self::String(_)
                | Self::Bytes(_)
                | Self::Ident(_)
                | Self::Keyword(
                    Keyword::True
                        | Keyword::False
                        | Keyword::None
                        | Keyword::Not
                        | Keyword::Lambda
                )
                | Self::LeftBrace
                | Self::Minus
                | Self::Plus
                | Self::Tilde
                | Self::RightShift
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::BigInt(digits) => f.write_str(digits),
            Self::Float(n) => write!(f, "{n}"),
            Self::Complex(n) => write!(f, "{n}j"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Self::Ident(name) => f.write_str(name),
            Self::Keyword(kw) => f.write_str(kw.as_str()),
            Self::Error(msg) => write!(f, "ERROR({msg})"),
            fixed => f.write_str(fixed.fixed_text().unwrap_or("?")),
        }
    }
}

// =============================================================================
// Keywords
// =============================================================================

macro_rules! keywords {
    ($( $variant:ident => $text:literal, )*) => {
        /// Reserved words.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $( #[doc = concat!("`", $text, "`")] $variant, )*
        }

        impl Keyword {
            /// Every keyword, in declaration order.
            pub const ALL: &'static [Keyword] = &[$( Self::$variant, )*];

            /// The keyword spelled `text`, if any.
            #[must_use]
            pub fn lookup(text: &str) -> Option<Self> {
                match text {
                    $( $text => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// Source spelling.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )*
                }
            }
        }
    };
}

keywords! {
    False => "False",
    None => "None",
    True => "True",
    And => "and",
    As => "as",
    Assert => "assert",
    Async => "async",
    Await => "await",
    Break => "break",
    Class => "class",
    Continue => "continue",
    Def => "def",
    Del => "del",
    Elif => "elif",
    Else => "else",
    Except => "except",
    Finally => "finally",
    For => "for",
    From => "from",
    Global => "global",
    If => "if",
    Import => "import",
    In => "in",
    Is => "is",
    Lambda => "lambda",
    Nonlocal => "nonlocal",
    Not => "not",
    Or => "or",
    Pass => "pass",
    Raise => "raise",
    Return => "return",
    Try => "try",
    While => "while",
    With => "with",
    Yield => "yield",
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_predicates() {
        let eof = Token::new(TokenKind::Eof, Span::new(9, 9));
        let newline = Token::new(TokenKind::Newline, Span::new(3, 4));
        assert!(eof.is_eof() && !eof.is_newline());
        assert!(newline.is_newline() && !newline.is_eof());
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Keyword::lookup("lambda"), Some(Keyword::Lambda));
        assert_eq!(Keyword::lookup("None"), Some(Keyword::None));
        assert_eq!(Keyword::lookup("none"), None);
        assert_eq!(Keyword::lookup("match"), None);
        assert_eq!(Keyword::lookup("print"), None);
        assert_eq!(Keyword::lookup("exec"), None);
    }

    #[test]
    fn test_every_keyword_round_trips() {
        assert_eq!(Keyword::ALL.len(), 35);
        for &kw in Keyword::ALL {
            assert_eq!(Keyword::lookup(kw.as_str()), Some(kw));
            assert_eq!(kw.to_string(), kw.as_str());
        }
    }

    #[test]
    fn test_comparisons() {
        for kind in [TokenKind::Less, TokenKind::NotEqual, TokenKind::GreaterEqual] {
            assert!(kind.is_comparison(), "{kind}");
        }
        assert!(!TokenKind::Equal.is_comparison());
        assert!(!TokenKind::LeftShift.is_comparison());
    }

    #[test]
    fn test_augmented_assign() {
        for kind in [
            TokenKind::PlusEqual,
            TokenKind::DoubleSlashEqual,
            TokenKind::LeftShiftEqual,
            TokenKind::AtEqual,
        ] {
            assert!(kind.is_augmented_assign(), "{kind}");
        }
        for kind in [
            TokenKind::Equal,
            TokenKind::EqualEqual,
            TokenKind::LessEqual,
            TokenKind::ColonEqual,
            TokenKind::Int(3),
        ] {
            assert!(!kind.is_augmented_assign(), "{kind}");
        }
    }

    #[test]
    fn test_starts_print_operand() {
        assert!(TokenKind::Ident("x".to_string()).starts_print_operand());
        assert!(TokenKind::String("hi".to_string()).starts_print_operand());
        assert!(TokenKind::RightShift.starts_print_operand());
        assert!(!TokenKind::LeftParen.starts_print_operand());
        assert!(!TokenKind::LeftBracket.starts_print_operand());
        assert!(!TokenKind::Equal.starts_print_operand());
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::LeftBrace.to_string(), "{");
        assert_eq!(TokenKind::Ellipsis.to_string(), "...");
        assert_eq!(TokenKind::Dedent.to_string(), "DEDENT");
        assert_eq!(TokenKind::Complex(2.0).to_string(), "2j");
        assert_eq!(TokenKind::String("a\"b".to_string()).to_string(), "\"a\\\"b\"");
        assert_eq!(TokenKind::Keyword(Keyword::Yield).to_string(), "yield");
        assert_eq!(TokenKind::Int(7).fixed_text(), None);
    }
}
