//! String and bytes literals.
//!
//! Single, double and triple quotes with the `r`, `b`, `u` and `f` prefixes.
//! An f-string is lexed as one plain [`TokenKind::String`]; replacement fields
//! are kept verbatim and never parsed.

use super::cursor::{Cursor, EOF_CHAR};
use crate::token::TokenKind;

/// String prefix flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringPrefix {
    /// No escape processing.
    pub raw: bool,
    /// Bytes literal.
    pub bytes: bool,
    /// Format string.
    pub format: bool,
    /// Legacy `u` marker.
    pub unicode: bool,
}

impl StringPrefix {
    /// Build prefix flags from prefix characters (case-insensitive).
    #[must_use]
    pub fn from_chars(chars: &str) -> Self {
        let mut prefix = Self::default();
        for c in chars.chars() {
            match c.to_ascii_lowercase() {
                'r' => prefix.raw = true,
                'b' => prefix.bytes = true,
                'f' => prefix.format = true,
                'u' => prefix.unicode = true,
                _ => {}
            }
        }
        prefix
    }

    /// `b` excludes `f` and `u`; `u` excludes `r` and `f`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        if self.bytes && (self.format || self.unicode) {
            return false;
        }
        !(self.unicode && (self.raw || self.format))
    }
}

/// Lex a string literal. The cursor must sit on the opening quote; any prefix
/// has already been consumed.
pub fn lex_string(cursor: &mut Cursor<'_>, prefix: StringPrefix) -> TokenKind {
    let quote = cursor.bump_or_eof();
    if quote != '"' && quote != '\'' {
        return TokenKind::Error("expected quote".to_string());
    }

    let triple = cursor.first() == quote && cursor.second() == quote;
    if triple {
        cursor.bump();
        cursor.bump();
    }

    let body = match read_body(cursor, quote, triple, prefix.raw) {
        Ok(body) => body,
        Err(message) => return TokenKind::Error(message),
    };

    if prefix.bytes {
        match to_bytes(&body) {
            Some(bytes) => TokenKind::Bytes(bytes),
            None => TokenKind::Error("bytes can only contain ASCII literal characters".to_string()),
        }
    } else {
        TokenKind::String(body)
    }
}

fn read_body(
    cursor: &mut Cursor<'_>,
    quote: char,
    triple: bool,
    raw: bool,
) -> Result<String, String> {
    let mut body = String::new();

    loop {
        let c = cursor.first();
        if cursor.is_eof() {
            return Err("unterminated string literal".to_string());
        }

        if c == quote {
            if !triple {
                cursor.bump();
                return Ok(body);
            }
            if cursor.second() == quote && cursor.peek_nth(2) == quote {
                cursor.bump();
                cursor.bump();
                cursor.bump();
                return Ok(body);
            }
        }

        if !triple && (c == '\n' || c == '\r') {
            return Err("unterminated string literal".to_string());
        }

        cursor.bump();
        if c != '\\' {
            body.push(c);
            continue;
        }

        if raw {
            body.push('\\');
            let next = cursor.first();
            if !cursor.is_eof() && (next == quote || next == '\\') {
                body.push(next);
                cursor.bump();
            }
        } else {
            read_escape(cursor, &mut body)?;
        }
    }
}

/// Decode one escape sequence into `body`.
fn read_escape(cursor: &mut Cursor<'_>, body: &mut String) -> Result<(), String> {
    let c = cursor.bump_or_eof();
    let decoded = match c {
        '\n' => return Ok(()),
        '\r' => {
            cursor.eat('\n');
            return Ok(());
        }
        '\\' | '\'' | '"' => c,
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0c',
        'v' => '\x0b',
        'x' => read_hex(cursor, 2)?,
        'u' => read_hex(cursor, 4)?,
        'U' => read_hex(cursor, 8)?,
        'N' => read_named(cursor)?,
        '0'..='7' => read_octal(cursor, c),
        EOF_CHAR => return Err("unterminated string literal".to_string()),
        other => {
            // Unknown escapes keep their backslash.
            body.push('\\');
            other
        }
    };
    body.push(decoded);
    Ok(())
}

fn read_hex(cursor: &mut Cursor<'_>, digits: usize) -> Result<char, String> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let c = cursor.bump_or_eof();
        let digit = c
            .to_digit(16)
            .ok_or_else(|| format!("truncated \\x{} escape", digits))?;
        value = value * 16 + digit;
    }
    char::from_u32(value).ok_or_else(|| format!("invalid code point U+{:X}", value))
}

fn read_octal(cursor: &mut Cursor<'_>, first: char) -> char {
    let mut value = first as u32 - '0' as u32;
    for _ in 0..2 {
        match cursor.first().to_digit(8) {
            Some(digit) => {
                value = value * 8 + digit;
                cursor.bump();
            }
            None => break,
        }
    }
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// `\N{NAME}` is accepted but not resolved.
fn read_named(cursor: &mut Cursor<'_>) -> Result<char, String> {
    if !cursor.eat('{') {
        return Err("malformed \\N escape".to_string());
    }
    loop {
        match cursor.bump() {
            Some('}') => return Ok(char::REPLACEMENT_CHARACTER),
            Some('\n') | None => return Err("malformed \\N escape".to_string()),
            Some(_) => {}
        }
    }
}

fn to_bytes(body: &str) -> Option<Vec<u8>> {
    body.chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}
