//! Source-mapped diagnostics with CPython-style caret display.
//!
//! Output format:
//! ```text
//!   File "test.py", line 2
//!     f = lambda: 1
//!         ^
//! FeatureNotSupported: Lambda
//! ```

use subpy_core::Span;
use subpy_parser::SourceMap;

// =============================================================================
// Error Rendering
// =============================================================================

/// Render a diagnostic for a byte span of `source`.
///
/// Multi-character spans on one line are underlined with tildes around a
/// centred caret.
pub fn render_source_error(
    source: &str,
    filename: &str,
    span: Span,
    error_type: &str,
    message: &str,
) -> String {
    let map = SourceMap::new(source);
    let pos = map.resolve(span.start as usize);
    let end_pos = map.resolve(span.end.saturating_sub(1).max(span.start) as usize);

    let mut output = String::with_capacity(256);
    output.push_str(&format!("  File \"{}\", line {}\n", filename, pos.line));

    if let Some(line_text) = map.line_text(source, pos.line) {
        let caret_end = if pos.line == end_pos.line {
            end_pos.column + 1
        } else {
            line_text.len()
        };
        let caret_len = caret_end.saturating_sub(pos.column).max(1);
        push_marked_line(&mut output, line_text, pos.column, caret_len);
    }

    output.push_str(&render_simple_error(error_type, message));
    output
}

/// Render a diagnostic for a resolved site.
///
/// `column` is 1-based; `source_line` is the full text of `line`.
pub fn render_site_error(
    filename: &str,
    line: usize,
    column: usize,
    source_line: &str,
    error_type: &str,
    message: &str,
) -> String {
    let mut output = String::with_capacity(256);
    output.push_str(&format!("  File \"{}\", line {}\n", filename, line));
    if !source_line.is_empty() {
        push_marked_line(&mut output, source_line, column.saturating_sub(1), 1);
    }
    output.push_str(&render_simple_error(error_type, message));
    output
}

fn push_marked_line(output: &mut String, line_text: &str, column: usize, caret_len: usize) {
    output.push_str("    ");
    output.push_str(line_text);
    output.push('\n');

    output.push_str("    ");
    // Tabs are kept so the caret lines up under the same indentation.
    for c in line_text.chars().take(column) {
        output.push(if c == '\t' { '\t' } else { ' ' });
    }
    if caret_len == 1 {
        output.push('^');
    } else {
        let mid = caret_len / 2;
        for i in 0..caret_len {
            output.push(if i == mid { '^' } else { '~' });
        }
    }
    output.push('\n');
}

/// Render an error with no source location.
pub fn render_simple_error(error_type: &str, message: &str) -> String {
    if message.is_empty() {
        error_type.to_string()
    } else {
        format!("{}: {}", error_type, message)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Span Rendering Tests
    // =========================================================================

    #[test]
    fn test_render_source_error_single_char() {
        let output = render_source_error(
            "x = 1 / ?",
            "test.py",
            Span::new(8, 9),
            "SyntaxError",
            "invalid syntax",
        );
        assert_eq!(
            output,
            "  File \"test.py\", line 1\n    x = 1 / ?\n            ^\nSyntaxError: invalid syntax"
        );
    }

    #[test]
    fn test_render_source_error_multichar_span() {
        let output = render_source_error(
            "result = undefined_name",
            "test.py",
            Span::new(9, 23),
            "SyntaxError",
            "bad",
        );
        assert!(output.contains("result = undefined_name"));
        assert!(output.contains("~"));
        assert!(output.contains("^"));
    }

    #[test]
    fn test_render_source_error_second_line() {
        let output = render_source_error(
            "x = 1\ny = $",
            "test.py",
            Span::new(10, 11),
            "SyntaxError",
            "unexpected character",
        );
        assert!(output.contains("File \"test.py\", line 2"));
        assert!(output.contains("    y = $\n        ^\n"));
    }

    #[test]
    fn test_render_error_zero_length_span() {
        let output = render_source_error("x = 1", "test.py", Span::new(2, 2), "SyntaxError", "x");
        assert!(output.contains("      ^\n"));
    }

    #[test]
    fn test_span_past_end() {
        let output = render_source_error("x = (", "t.py", Span::new(5, 5), "SyntaxError", "eof");
        assert!(output.contains("line 1"));
        assert!(output.ends_with("SyntaxError: eof"));
    }

    // =========================================================================
    // Site Rendering Tests
    // =========================================================================

    #[test]
    fn test_render_site_error() {
        let output = render_site_error(
            "prog.py",
            2,
            12,
            "    return lambda: 1",
            "FeatureNotSupported",
            "Lambda",
        );
        let caret = format!("{}^", " ".repeat(4 + 11));
        let expected = [
            "  File \"prog.py\", line 2",
            "        return lambda: 1",
            caret.as_str(),
            "FeatureNotSupported: Lambda",
        ]
        .join("\n");
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_site_error_keeps_tabs() {
        let output = render_site_error("t.py", 1, 3, "\t\tx", "E", "m");
        assert!(output.contains("    \t\tx\n    \t\t^\n"));
    }

    #[test]
    fn test_render_site_error_without_line() {
        let output = render_site_error("t.py", 9, 1, "", "LibraryNotSupported", "'os'");
        assert_eq!(output, "  File \"t.py\", line 9\nLibraryNotSupported: 'os'");
    }

    #[test]
    fn test_render_simple_error() {
        assert_eq!(render_simple_error("TypeError", "bad"), "TypeError: bad");
        assert_eq!(render_simple_error("KeyboardInterrupt", ""), "KeyboardInterrupt");
    }
}
