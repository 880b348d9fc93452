//! Character cursor with byte-offset tracking and bounded lookahead.

use subpy_core::Span;

/// Sentinel returned by lookahead past the end of input.
pub const EOF_CHAR: char = '\0';

/// A forward-only cursor over source text.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    chars: std::str::Chars<'src>,
    pos: usize,
}

impl<'src> Cursor<'src> {
    /// Create a cursor positioned at the start of `source`.
    #[inline]
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.chars(),
            pos: 0,
        }
    }

    /// Current byte offset.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Check if all input has been consumed.
    #[inline]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Look `n` characters ahead without consuming (`peek_nth(0)` is the next one).
    #[inline]
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> char {
        self.chars.clone().nth(n).unwrap_or(EOF_CHAR)
    }

    /// Next character without consuming it.
    #[inline]
    #[must_use]
    pub fn first(&self) -> char {
        self.peek_nth(0)
    }

    /// Character after next without consuming it.
    #[inline]
    #[must_use]
    pub fn second(&self) -> char {
        self.peek_nth(1)
    }

    /// Consume and return the next character.
    #[inline]
    pub fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the next character, yielding [`EOF_CHAR`] at the end.
    #[inline]
    pub fn bump_or_eof(&mut self) -> char {
        self.bump().unwrap_or(EOF_CHAR)
    }

    /// Consume `c` if it is next.
    #[inline]
    pub fn eat(&mut self, c: char) -> bool {
        if self.first() == c && !self.is_eof() {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume characters while `predicate` holds.
    #[inline]
    pub fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while !self.is_eof() && predicate(self.first()) {
            self.bump();
        }
    }

    /// Source text from `start` to the current position.
    #[inline]
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.source[start..self.pos]
    }

    /// Span from `start` to the current position.
    #[inline]
    #[must_use]
    pub fn span_from(&self, start: usize) -> Span {
        Span::from_offsets(start, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cursor() {
        let cursor = Cursor::new("");
        assert!(cursor.is_eof());
        assert_eq!(cursor.first(), EOF_CHAR);
    }

    #[test]
    fn test_lookahead() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.first(), 'a');
        assert_eq!(cursor.second(), 'b');
        assert_eq!(cursor.peek_nth(2), 'c');
        assert_eq!(cursor.peek_nth(3), EOF_CHAR);
    }

    #[test]
    fn test_bump_tracks_utf8_width() {
        let mut cursor = Cursor::new("αb");
        assert_eq!(cursor.bump(), Some('α'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.bump(), Some('b'));
        assert_eq!(cursor.bump(), None);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_eat_and_eat_while() {
        let mut cursor = Cursor::new("   x=1");
        cursor.eat_while(|c| c == ' ');
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.eat('x'));
        assert!(!cursor.eat('x'));
        assert_eq!(cursor.slice_from(3), "x");
        assert_eq!(cursor.span_from(3), Span::new(3, 4));
    }

    #[test]
    fn test_eat_never_consumes_sentinel() {
        let mut cursor = Cursor::new("");
        assert!(!cursor.eat(EOF_CHAR));
    }
}
