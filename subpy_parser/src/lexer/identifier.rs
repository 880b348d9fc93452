//! Identifiers, keywords and string-prefix detection.
//!
//! Identifier characters follow PEP 3131 (`XID_Start` / `XID_Continue` plus `_`).

use super::cursor::Cursor;
use super::string::StringPrefix;
use crate::token::{Keyword, TokenKind};

/// Check if a character can start an identifier.
#[inline]
#[must_use]
pub fn is_id_start(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic() || c == '_';
    }
    unicode_xid::UnicodeXID::is_xid_start(c)
}

/// Check if a character can continue an identifier.
#[inline]
#[must_use]
pub fn is_id_continue(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric() || c == '_';
    }
    unicode_xid::UnicodeXID::is_xid_continue(c)
}

/// Lex an identifier or keyword. The cursor must sit on its first character.
pub fn lex_identifier(cursor: &mut Cursor<'_>) -> TokenKind {
    let start = cursor.pos();
    cursor.bump();
    cursor.eat_while(is_id_continue);

    let text = cursor.slice_from(start);
    match Keyword::lookup(text) {
        Some(kw) => TokenKind::Keyword(kw),
        None => TokenKind::Ident(text.to_string()),
    }
}

/// If the cursor sits on a string prefix immediately followed by a quote,
/// return the parsed prefix and its length in characters.
#[must_use]
pub fn string_prefix_at(cursor: &Cursor<'_>) -> Option<(StringPrefix, usize)> {
    let is_quote = |c: char| c == '"' || c == '\'';

    for len in 1..=2 {
        if !is_quote(cursor.peek_nth(len)) {
            continue;
        }
        let prefix: String = (0..len).map(|i| cursor.peek_nth(i)).collect();
        if !prefix.chars().all(is_prefix_char) {
            return None;
        }
        let parsed = StringPrefix::from_chars(&prefix);
        return parsed.is_valid().then_some((parsed, len));
    }
    None
}

#[inline]
fn is_prefix_char(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'r' | 'b' | 'f' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(s: &str) -> TokenKind {
        let mut cursor = Cursor::new(s);
        lex_identifier(&mut cursor)
    }

    #[test]
    fn test_ascii_classes() {
        assert!(is_id_start('a'));
        assert!(is_id_start('_'));
        assert!(!is_id_start('0'));
        assert!(is_id_continue('0'));
        assert!(!is_id_continue('-'));
    }

    #[test]
    fn test_unicode_classes() {
        assert!(is_id_start('π'));
        assert!(is_id_continue('\u{0300}'));
        assert!(!is_id_start('①'));
    }

    #[test]
    fn test_identifier_and_keyword() {
        assert_eq!(lex("spam = 1"), TokenKind::Ident("spam".to_string()));
        assert_eq!(lex("def f"), TokenKind::Keyword(Keyword::Def));
        assert_eq!(lex("iffy"), TokenKind::Ident("iffy".to_string()));
        assert_eq!(lex("print x"), TokenKind::Ident("print".to_string()));
        assert_eq!(lex("match"), TokenKind::Ident("match".to_string()));
    }

    #[test]
    fn test_string_prefix_detection() {
        let (prefix, len) = string_prefix_at(&Cursor::new("rb'x'")).unwrap();
        assert_eq!(len, 2);
        assert!(prefix.raw && prefix.bytes);

        let (prefix, len) = string_prefix_at(&Cursor::new("f\"{x}\"")).unwrap();
        assert_eq!(len, 1);
        assert!(prefix.format);

        assert!(string_prefix_at(&Cursor::new("rx'")).is_none());
        assert!(string_prefix_at(&Cursor::new("bf''")).is_none());
        assert!(string_prefix_at(&Cursor::new("r = 1")).is_none());
    }
}
