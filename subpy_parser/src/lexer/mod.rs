//! Tokenizer.
//!
//! Produces a flat token stream with explicit `Newline`, `Indent` and
//! `Dedent` tokens. Blank and comment-only lines produce nothing; newlines
//! inside brackets and after a `\` continuation are skipped. The stream
//! always ends with a `Newline` (when the last line had content), the
//! closing `Dedent`s, then `Eof`.

pub mod cursor;
pub mod identifier;
pub mod indent;
pub mod number;
pub mod string;

use std::collections::VecDeque;

use crate::token::{Token, TokenKind};
use cursor::Cursor;
use indent::{IndentChange, IndentStack, measure_indent};

/// Streaming tokenizer over one source text.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    indents: IndentStack,
    pending: VecDeque<Token>,
    at_line_start: bool,
    line_has_content: bool,
    finished: bool,
    exhausted: bool,
}

impl<'src> Lexer<'src> {
    /// Create a lexer for `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            indents: IndentStack::new(),
            pending: VecDeque::new(),
            at_line_start: true,
            line_has_content: false,
            finished: false,
            exhausted: false,
        }
    }

    /// Produce the next token. After `Eof` every call yields `Eof` again.
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pending.pop_front() {
            return token;
        }

        loop {
            if self.at_line_start && !self.indents.in_brackets() {
                if let Some(token) = self.start_line() {
                    return token;
                }
                if let Some(token) = self.pending.pop_front() {
                    return token;
                }
            }

            self.cursor
                .eat_while(|c| c == ' ' || c == '\t' || c == '\x0c');

            let start = self.cursor.pos();
            if self.cursor.is_eof() {
                return self.finish(start);
            }

            match self.cursor.first() {
                '#' => self.skip_comment(),
                '\\' if matches!(self.cursor.second(), '\n' | '\r') => {
                    self.cursor.bump();
                    self.eat_line_break();
                }
                '\n' | '\r' => {
                    self.eat_line_break();
                    if self.indents.in_brackets() {
                        continue;
                    }
                    self.at_line_start = true;
                    if self.line_has_content {
                        self.line_has_content = false;
                        return Token::new(TokenKind::Newline, self.cursor.span_from(start));
                    }
                }
                _ => {
                    let kind = self.lex_token();
                    self.line_has_content = true;
                    return Token::new(kind, self.cursor.span_from(start));
                }
            }
        }
    }

    /// Handle the leading whitespace of a physical line. Returns an `Indent`
    /// or error token; dedents are queued in `pending`.
    fn start_line(&mut self) -> Option<Token> {
        loop {
            let indent = measure_indent(&mut self.cursor);
            match self.cursor.first() {
                '#' => {
                    self.skip_comment();
                    if !self.cursor.is_eof() {
                        self.eat_line_break();
                        continue;
                    }
                }
                '\n' | '\r' if !self.cursor.is_eof() => {
                    self.eat_line_break();
                    continue;
                }
                _ => {}
            }

            if self.cursor.is_eof() {
                return None;
            }

            self.at_line_start = false;
            let here = self.cursor.span_from(self.cursor.pos());
            return match self.indents.change_to(indent) {
                Ok(IndentChange::Same) => None,
                Ok(IndentChange::Indent) => Some(Token::new(TokenKind::Indent, here)),
                Ok(IndentChange::Dedent(count)) => {
                    self.pending
                        .extend((0..count).map(|_| Token::new(TokenKind::Dedent, here)));
                    None
                }
                Err(message) => Some(Token::new(TokenKind::Error(message.to_string()), here)),
            };
        }
    }

    fn finish(&mut self, at: usize) -> Token {
        let here = self.cursor.span_from(at);
        if !self.finished {
            self.finished = true;
            if self.line_has_content {
                self.line_has_content = false;
                self.pending.push_back(Token::new(TokenKind::Newline, here));
            }
            let open = self.indents.close_all();
            self.pending
                .extend((0..open).map(|_| Token::new(TokenKind::Dedent, here)));
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
        }
        Token::new(TokenKind::Eof, here)
    }

    fn skip_comment(&mut self) {
        self.cursor.eat_while(|c| c != '\n' && c != '\r');
    }

    fn eat_line_break(&mut self) {
        self.cursor.eat('\r');
        self.cursor.eat('\n');
    }

    fn lex_token(&mut self) -> TokenKind {
        let c = self.cursor.first();

        if identifier::is_id_start(c) {
            if let Some((prefix, len)) = identifier::string_prefix_at(&self.cursor) {
                for _ in 0..len {
                    self.cursor.bump();
                }
                return string::lex_string(&mut self.cursor, prefix);
            }
            return identifier::lex_identifier(&mut self.cursor);
        }
        if c == '"' || c == '\'' {
            return string::lex_string(&mut self.cursor, string::StringPrefix::default());
        }
        if number::is_number_start(c, self.cursor.second()) {
            return number::lex_number(&mut self.cursor);
        }

        self.cursor.bump();
        self.lex_operator(c)
    }

    fn lex_operator(&mut self, c: char) -> TokenKind {
        use TokenKind as T;

        match c {
            '(' => {
                self.indents.open_bracket();
                T::LeftParen
            }
            '[' => {
                self.indents.open_bracket();
                T::LeftBracket
            }
            '{' => {
                self.indents.open_bracket();
                T::LeftBrace
            }
            ')' => {
                self.indents.close_bracket();
                T::RightParen
            }
            ']' => {
                self.indents.close_bracket();
                T::RightBracket
            }
            '}' => {
                self.indents.close_bracket();
                T::RightBrace
            }
            ',' => T::Comma,
            ';' => T::Semicolon,
            '~' => T::Tilde,
            '.' => {
                if self.cursor.first() == '.' && self.cursor.second() == '.' {
                    self.cursor.bump();
                    self.cursor.bump();
                    T::Ellipsis
                } else {
                    T::Dot
                }
            }
            ':' => self.pick('=', T::ColonEqual, T::Colon),
            '=' => self.pick('=', T::EqualEqual, T::Equal),
            '+' => self.pick('=', T::PlusEqual, T::Plus),
            '%' => self.pick('=', T::PercentEqual, T::Percent),
            '@' => self.pick('=', T::AtEqual, T::At),
            '&' => self.pick('=', T::AmpersandEqual, T::Ampersand),
            '|' => self.pick('=', T::PipeEqual, T::Pipe),
            '^' => self.pick('=', T::CaretEqual, T::Caret),
            '-' => {
                if self.cursor.eat('>') {
                    T::Arrow
                } else {
                    self.pick('=', T::MinusEqual, T::Minus)
                }
            }
            '!' => {
                if self.cursor.eat('=') {
                    T::NotEqual
                } else {
                    T::Error("unexpected character '!'".to_string())
                }
            }
            '*' => {
                if self.cursor.eat('*') {
                    self.pick('=', T::DoubleStarEqual, T::DoubleStar)
                } else {
                    self.pick('=', T::StarEqual, T::Star)
                }
            }
            '/' => {
                if self.cursor.eat('/') {
                    self.pick('=', T::DoubleSlashEqual, T::DoubleSlash)
                } else {
                    self.pick('=', T::SlashEqual, T::Slash)
                }
            }
            '<' => {
                if self.cursor.eat('<') {
                    self.pick('=', T::LeftShiftEqual, T::LeftShift)
                } else if self.cursor.eat('>') {
                    T::NotEqual
                } else {
                    self.pick('=', T::LessEqual, T::Less)
                }
            }
            '>' => {
                if self.cursor.eat('>') {
                    self.pick('=', T::RightShiftEqual, T::RightShift)
                } else {
                    self.pick('=', T::GreaterEqual, T::Greater)
                }
            }
            other => T::Error(format!("unexpected character {:?}", other)),
        }
    }

    #[inline]
    fn pick(&mut self, next: char, joined: TokenKind, single: TokenKind) -> TokenKind {
        if self.cursor.eat(next) { joined } else { single }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to and including the first `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        self.exhausted = token.is_eof();
        Some(token)
    }
}

/// Tokenize a whole source text. The last token is always `Eof`.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Keyword;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_string())
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("\n\n# only a comment\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_simple_statement() {
        assert_eq!(
            kinds("x = 1"),
            vec![
                ident("x"),
                TokenKind::Equal,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_indent_dedent() {
        let source = "if x:\n    y\n    z\nw\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Keyword(Keyword::If),
                ident("x"),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                ident("y"),
                TokenKind::Newline,
                ident("z"),
                TokenKind::Newline,
                TokenKind::Dedent,
                ident("w"),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_dedents_at_eof() {
        let source = "def f():\n  if x:\n    return 1";
        let tail: Vec<_> = kinds(source).into_iter().rev().take(4).collect();
        assert_eq!(
            tail,
            vec![
                TokenKind::Eof,
                TokenKind::Dedent,
                TokenKind::Dedent,
                TokenKind::Newline
            ]
        );
    }

    #[test]
    fn test_blank_and_comment_lines_ignored() {
        let source = "if x:\n\n    # note\n    y\n";
        assert_eq!(
            kinds(source)
                .iter()
                .filter(|k| **k == TokenKind::Indent)
                .count(),
            1
        );
    }

    #[test]
    fn test_brackets_suppress_newlines() {
        let source = "x = [1,\n     2]\n";
        assert_eq!(
            kinds(source),
            vec![
                ident("x"),
                TokenKind::Equal,
                TokenKind::LeftBracket,
                TokenKind::Int(1),
                TokenKind::Comma,
                TokenKind::Int(2),
                TokenKind::RightBracket,
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_backslash_continuation() {
        assert_eq!(
            kinds("x = 1 + \\\n    2\n"),
            vec![
                ident("x"),
                TokenKind::Equal,
                TokenKind::Int(1),
                TokenKind::Plus,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a **= b // c -> ... != <> :="),
            vec![
                ident("a"),
                TokenKind::DoubleStarEqual,
                ident("b"),
                TokenKind::DoubleSlash,
                ident("c"),
                TokenKind::Arrow,
                TokenKind::Ellipsis,
                TokenKind::NotEqual,
                TokenKind::NotEqual,
                TokenKind::ColonEqual,
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_prefixed_strings() {
        assert_eq!(
            kinds("b'x' r'\\d' f'{y}'"),
            vec![
                TokenKind::Bytes(b"x".to_vec()),
                TokenKind::String("\\d".to_string()),
                TokenKind::String("{y}".to_string()),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unknown_character() {
        assert!(matches!(kinds("x = $")[2], TokenKind::Error(_)));
    }

    #[test]
    fn test_inconsistent_dedent_is_error() {
        let source = "if x:\n    y\n  z\n";
        assert!(kinds(source).iter().any(|k| matches!(k, TokenKind::Error(_))));
    }

    #[test]
    fn test_mixed_tabs_and_spaces_is_error() {
        let tokens = kinds("if x:\n\tpass\n        pass\n");
        assert!(tokens.contains(&TokenKind::Error(
            "inconsistent use of tabs and spaces in indentation".to_string()
        )));
        assert!(!kinds("if x:\n\tpass\n\tpass\n")
            .iter()
            .any(|k| matches!(k, TokenKind::Error(_))));
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("ab = 10");
        assert_eq!(tokens[0].span, subpy_core::Span::new(0, 2));
        assert_eq!(tokens[2].span, subpy_core::Span::new(5, 7));
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            kinds("x\r\ny\r\n"),
            vec![
                ident("x"),
                TokenKind::Newline,
                ident("y"),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_iterator_stops_after_eof() {
        let tokens: Vec<Token> = Lexer::new("x").collect();
        assert_eq!(tokens.len(), 3);
        assert!(tokens[2].is_eof());
    }
}
