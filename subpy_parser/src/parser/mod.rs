//! Recursive descent parser with Pratt parsing for expressions.
//!
//! The parser stops at the first error; a lexer error token surfaces as
//! [`SubpyError::LexError`], anything else as [`SubpyError::SyntaxError`].

mod expr;
mod stmt;

use crate::ast::{Expr, Module, Stmt};
use crate::lexer::Lexer;
use crate::token::{Keyword, Token, TokenKind};
use subpy_core::{Span, SubpyError, SubpyResult};

pub use expr::ExprParser;
pub use stmt::StmtParser;

/// Deepest expression nesting accepted, counting brackets, prefix operators,
/// trailers and each link of a binary operator chain.
pub const MAX_NESTING: usize = 200;

// =============================================================================
// Parser Core
// =============================================================================

/// Parser over one source text.
pub struct Parser<'src> {
    /// Token source.
    lexer: Lexer<'src>,
    /// Current token.
    current: Token,
    /// Previous token.
    previous: Token,
    /// One token of lookahead past `current`.
    peeked: Option<Token>,
    /// End offset of the last consumed token that was not layout.
    last_end: u32,
    /// Length of the source text.
    source_len: usize,
    /// Nesting of the expression under construction.
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source code.
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let first = lexer.next_token();
        Self {
            lexer,
            current: first.clone(),
            previous: first,
            peeked: None,
            last_end: 0,
            source_len: source.len(),
            depth: 0,
        }
    }

    /// Parse a whole module.
    pub fn parse_module(&mut self) -> SubpyResult<Module> {
        let end = self.source_end()?;
        let mut body = Vec::new();
        self.skip_newlines();

        while !self.is_at_end() {
            if self.check(TokenKind::Indent) {
                return Err(self.error_at_current("unexpected indent"));
            }
            self.parse_statement(&mut body)?;
            self.skip_newlines();
        }

        Ok(Module::new(body, Span::new(0, end)))
    }

    /// Parse one statement line (or compound statement) into `out`.
    ///
    /// A line of `;`-separated simple statements yields several statements.
    pub fn parse_statement(&mut self, out: &mut Vec<Stmt>) -> SubpyResult<()> {
        StmtParser::parse(self, out)
    }

    /// Parse a single expression, assignment expressions included.
    pub fn parse_expression(&mut self) -> SubpyResult<Expr> {
        ExprParser::parse(self, Precedence::Lowest)
    }

    /// Parse an expression whose operators all bind at least as tight as `min_prec`.
    pub fn parse_expression_with_precedence(&mut self, min_prec: Precedence) -> SubpyResult<Expr> {
        ExprParser::parse(self, min_prec)
    }

    // =========================================================================
    // Token Management
    // =========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Get the previous token.
    #[inline]
    pub fn previous(&self) -> &Token {
        &self.previous
    }

    /// Look at the token after the current one.
    pub fn peek(&mut self) -> &Token {
        let lexer = &mut self.lexer;
        self.peeked.get_or_insert_with(|| lexer.next_token())
    }

    /// Advance to the next token, returning the previous.
    pub fn advance(&mut self) -> &Token {
        let next = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
        self.previous = std::mem::replace(&mut self.current, next);
        if !matches!(
            self.previous.kind,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof
        ) {
            self.last_end = self.previous.span.end;
        }
        &self.previous
    }

    /// Check if the current token has the same kind as `kind` (payload ignored).
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(&kind)
    }

    /// Check if the current token is a specific keyword.
    #[inline]
    pub fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(k) if *k == kw)
    }

    /// Check if the current token is the identifier `name`.
    #[inline]
    pub fn check_ident(&self, name: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Ident(s) if s == name)
    }

    /// Consume the current token if it has `kind`'s discriminant.
    pub fn match_token(&mut self, kind: TokenKind) -> bool {
        let hit = self.check(kind);
        if hit {
            self.advance();
        }
        hit
    }

    /// Consume the current token if it is `kw`.
    pub fn match_keyword(&mut self, kw: Keyword) -> bool {
        let hit = self.check_keyword(kw);
        if hit {
            self.advance();
        }
        hit
    }

    /// Consume a token of `kind`, or fail with `msg` at the current token.
    pub fn expect(&mut self, kind: TokenKind, msg: &str) -> SubpyResult<&Token> {
        if !self.match_token(kind) {
            return Err(self.error_at_current(msg));
        }
        Ok(&self.previous)
    }

    /// Consume the keyword `kw`, or fail with `msg` at the current token.
    pub fn expect_keyword(&mut self, kw: Keyword, msg: &str) -> SubpyResult<&Token> {
        if !self.match_keyword(kw) {
            return Err(self.error_at_current(msg));
        }
        Ok(&self.previous)
    }

    /// Expect and consume an identifier, returning the name.
    pub fn expect_identifier(&mut self, msg: &str) -> SubpyResult<String> {
        if let TokenKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_at_current(msg))
        }
    }

    /// Skip any newline tokens.
    pub fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Check if at end of file.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    // =========================================================================
    // Nesting
    // =========================================================================

    /// Current expression nesting.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Go one level deeper, failing past [`MAX_NESTING`].
    pub fn descend(&mut self) -> SubpyResult<()> {
        self.depth += 1;
        if self.depth <= MAX_NESTING {
            return Ok(());
        }
        let msg = match self.previous.kind {
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                "too many nested parentheses"
            }
            _ => "expression too deeply nested",
        };
        Err(SubpyError::syntax(msg, self.current.span))
    }

    /// Return to a depth saved before descending.
    #[inline]
    pub fn restore_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    // =========================================================================
    // Span Tracking
    // =========================================================================

    /// Span from `start` to the end of the last consumed non-layout token.
    pub fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    /// End offset of the whole text, if every offset fits a span.
    fn source_end(&self) -> SubpyResult<u32> {
        u32::try_from(self.source_len).map_err(|_| {
            SubpyError::syntax(
                format!("source text of {} bytes is too large", self.source_len),
                Span::dummy(),
            )
        })
    }

    /// Start offset of the current token.
    pub fn start_span(&self) -> u32 {
        self.current.span.start
    }

    // =========================================================================
    // Error Handling
    // =========================================================================

    /// Create an error at the current token.
    pub fn error_at_current(&self, msg: &str) -> SubpyError {
        Self::error_at(&self.current, msg)
    }

    /// Create an error at the previous token.
    pub fn error_at_previous(&self, msg: &str) -> SubpyError {
        Self::error_at(&self.previous, msg)
    }

    fn error_at(token: &Token, msg: &str) -> SubpyError {
        let place = match &token.kind {
            TokenKind::Error(reason) => return SubpyError::lex(reason.clone(), token.span),
            TokenKind::Eof => "at end of file".to_string(),
            TokenKind::Newline => "at end of line".to_string(),
            TokenKind::Indent | TokenKind::Dedent => "at indentation change".to_string(),
            kind => format!("at '{kind}'"),
        };
        SubpyError::syntax(format!("{place}: {msg}"), token.span)
    }
}

// =============================================================================
// Precedence Levels
// =============================================================================

/// Binding power of an expression context, weakest first.
///
/// An operator is folded into the expression being parsed only when its
/// level is at least the context's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    /// Any expression, walrus included.
    Lowest,
    /// `name := value`
    NamedExpr,
    /// `a if c else b`, `lambda`
    Conditional,
    /// `or`
    Or,
    /// `and`
    And,
    /// Prefix `not`
    Not,
    /// `<`, `==`, `in`, `is` and friends
    Comparison,
    /// `|`
    BitwiseOr,
    /// `^`
    BitwiseXor,
    /// `&`
    BitwiseAnd,
    /// `<<`, `>>`
    Shift,
    /// Binary `+`, `-`
    Additive,
    /// `*`, `@`, `/`, `//`, `%`
    Multiplicative,
    /// Prefix `+`, `-`, `~`
    Unary,
    /// `**`
    Power,
    /// `await`
    Await,
    /// Calls, attributes, subscripts
    Primary,
}

impl Precedence {
    const LADDER: [Precedence; 17] = [
        Self::Lowest,
        Self::NamedExpr,
        Self::Conditional,
        Self::Or,
        Self::And,
        Self::Not,
        Self::Comparison,
        Self::BitwiseOr,
        Self::BitwiseXor,
        Self::BitwiseAnd,
        Self::Shift,
        Self::Additive,
        Self::Multiplicative,
        Self::Unary,
        Self::Power,
        Self::Await,
        Self::Primary,
    ];

    /// One level tighter; `Primary` is its own successor.
    #[must_use]
    pub fn next(self) -> Self {
        let index = (self as usize + 1).min(Self::LADDER.len() - 1);
        Self::LADDER[index]
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Parse source code into a module.
pub fn parse(source: &str) -> SubpyResult<Module> {
    Parser::new(source).parse_module()
}

/// Parse a single expression. Trailing tokens other than a newline are an error.
pub fn parse_expression(source: &str) -> SubpyResult<Expr> {
    let mut parser = Parser::new(source);
    parser.source_end()?;
    let expr = parser.parse_expression()?;
    parser.skip_newlines();
    if !parser.is_at_end() {
        return Err(parser.error_at_current("unexpected token after expression"));
    }
    Ok(expr)
}
