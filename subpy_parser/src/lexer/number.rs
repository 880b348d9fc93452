//! Numeric literals.
//!
//! Decimal, hex (`0x`), octal (`0o`) and binary (`0b`) integers with `_`
//! separators, floats with optional exponent, and imaginary literals (`3j`).
//! Integers that overflow `i64` are kept as text in [`TokenKind::BigInt`].

use super::cursor::Cursor;
use crate::token::TokenKind;

/// Check if the cursor sits on the start of a number (`.5` included).
#[inline]
#[must_use]
pub fn is_number_start(c: char, next: char) -> bool {
    c.is_ascii_digit() || (c == '.' && next.is_ascii_digit())
}

/// Lex a numeric literal. The cursor must sit on its first character.
pub fn lex_number(cursor: &mut Cursor<'_>) -> TokenKind {
    let start = cursor.pos();

    if cursor.first() == '0' {
        let radix = match cursor.second() {
            'x' | 'X' => Some(16),
            'o' | 'O' => Some(8),
            'b' | 'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            cursor.bump();
            cursor.bump();
            return lex_radix(cursor, start, radix);
        }
    }

    lex_decimal(cursor, start)
}

fn lex_radix(cursor: &mut Cursor<'_>, start: usize, radix: u32) -> TokenKind {
    let digits_start = cursor.pos();
    cursor.eat_while(|c| c == '_' || c.is_digit(radix));

    let digits: String = cursor
        .slice_from(digits_start)
        .chars()
        .filter(|c| *c != '_')
        .collect();
    if digits.is_empty() {
        return TokenKind::Error(format!("invalid base-{} literal", radix));
    }

    match i64::from_str_radix(&digits, radix) {
        Ok(n) => TokenKind::Int(n),
        Err(_) => TokenKind::BigInt(cursor.slice_from(start).to_string()),
    }
}

fn lex_decimal(cursor: &mut Cursor<'_>, start: usize) -> TokenKind {
    let mut is_float = false;

    cursor.eat_while(|c| c.is_ascii_digit() || c == '_');

    if cursor.first() == '.' && cursor.second() != '.' {
        is_float = true;
        cursor.bump();
        cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
    }

    if matches!(cursor.first(), 'e' | 'E') {
        let sign = matches!(cursor.second(), '+' | '-');
        let digit_at = if sign { 2 } else { 1 };
        if cursor.peek_nth(digit_at).is_ascii_digit() {
            is_float = true;
            cursor.bump();
            if sign {
                cursor.bump();
            }
            cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
    }

    let text: String = cursor
        .slice_from(start)
        .chars()
        .filter(|c| *c != '_')
        .collect();

    if matches!(cursor.first(), 'j' | 'J') {
        cursor.bump();
        return match text.parse::<f64>() {
            Ok(n) => TokenKind::Complex(n),
            Err(_) => TokenKind::Error("invalid imaginary literal".to_string()),
        };
    }

    if is_float {
        return match text.parse::<f64>() {
            Ok(n) => TokenKind::Float(n),
            Err(_) => TokenKind::Error("invalid float literal".to_string()),
        };
    }

    match text.parse::<i64>() {
        Ok(n) => TokenKind::Int(n),
        Err(_) => TokenKind::BigInt(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(s: &str) -> TokenKind {
        lex_number(&mut Cursor::new(s))
    }

    #[test]
    fn test_decimal_int() {
        assert_eq!(lex("42"), TokenKind::Int(42));
        assert_eq!(lex("1_000_000"), TokenKind::Int(1_000_000));
    }

    #[test]
    fn test_prefixed_ints() {
        assert_eq!(lex("0xff"), TokenKind::Int(255));
        assert_eq!(lex("0o755"), TokenKind::Int(0o755));
        assert_eq!(lex("0b1010"), TokenKind::Int(10));
        assert!(matches!(lex("0x"), TokenKind::Error(_)));
    }

    #[test]
    fn test_floats() {
        assert_eq!(lex("2.0"), TokenKind::Float(2.0));
        assert_eq!(lex(".5"), TokenKind::Float(0.5));
        assert_eq!(lex("1e3"), TokenKind::Float(1000.0));
        assert_eq!(lex("2.5e-1"), TokenKind::Float(0.25));
        assert_eq!(lex("1."), TokenKind::Float(1.0));
    }

    #[test]
    fn test_imaginary() {
        assert_eq!(lex("3j"), TokenKind::Complex(3.0));
        assert_eq!(lex("1.5J"), TokenKind::Complex(1.5));
    }

    #[test]
    fn test_big_int() {
        assert_eq!(
            lex("123456789012345678901234567890"),
            TokenKind::BigInt("123456789012345678901234567890".to_string())
        );
    }

    #[test]
    fn test_range_dots_not_consumed() {
        let mut cursor = Cursor::new("1..");
        assert_eq!(lex_number(&mut cursor), TokenKind::Int(1));
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn test_is_number_start() {
        assert!(is_number_start('7', ' '));
        assert!(is_number_start('.', '5'));
        assert!(!is_number_start('.', '.'));
    }
}
