//! Source text ownership and offset-to-position mapping.
//!
//! [`SourceUnit`] bundles a text, its parsed [`Module`] and a [`SourceMap`],
//! so consumers can resolve any node's span to a line, a column and the
//! line's text.

use crate::ast::Module;
use crate::parser::parse;
use subpy_core::{Span, SubpyResult};

// =============================================================================
// Source Map
// =============================================================================

/// Line start table over one source text.
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Byte offsets of each line start (always starts with 0).
    line_starts: Vec<usize>,
}

/// A resolved position: 1-indexed line, 0-indexed byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    /// 1-indexed line number.
    pub line: usize,
    /// 0-indexed column (byte offset from line start).
    pub column: usize,
}

impl SourceMap {
    /// Build the line table for `source`.
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        Self { line_starts }
    }

    /// Resolve a byte offset to a position.
    #[inline]
    pub fn resolve(&self, offset: usize) -> SourcePosition {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        SourcePosition {
            line: line_idx + 1,
            column: offset.saturating_sub(self.line_starts[line_idx]),
        }
    }

    /// Text of `line` (1-indexed) in `source`, without its line break.
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> Option<&'a str> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(source.len());
        let text = source.get(start..end)?;
        Some(text.trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Number of lines (a trailing newline opens an empty last line).
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

// =============================================================================
// Source Unit
// =============================================================================

/// A parsed source text with its line table.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    text: String,
    module: Module,
    map: SourceMap,
}

impl SourceUnit {
    /// Parse a complete source file.
    ///
    /// # Errors
    /// Returns the first lex or syntax error.
    pub fn parse(text: impl Into<String>) -> SubpyResult<Self> {
        let text = text.into();
        let module = parse(&text)?;
        let map = SourceMap::new(&text);
        Ok(Self { text, module, map })
    }

    /// Parse an indented fragment (for example, a block copied out of a
    /// larger file) after removing the whitespace common to all its lines.
    ///
    /// # Errors
    /// Returns the first lex or syntax error in the dedented text.
    pub fn from_snippet(text: &str) -> SubpyResult<Self> {
        Self::parse(dedent(text))
    }

    /// The source text (dedented, for snippets).
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed module.
    #[inline]
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// The line table.
    #[inline]
    pub fn source_map(&self) -> &SourceMap {
        &self.map
    }

    /// Position of the start of `span`.
    #[inline]
    pub fn position(&self, span: Span) -> SourcePosition {
        self.map.resolve(span.start as usize)
    }

    /// Text of `line` (1-indexed), or the empty string past the end.
    pub fn line_text(&self, line: usize) -> &str {
        self.map.line_text(&self.text, line).unwrap_or("")
    }
}

/// Remove the longest whitespace prefix shared by every non-blank line.
/// Whitespace-only lines are normalized to empty lines.
#[must_use]
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin = margin.unwrap_or("");

    let mut out = String::with_capacity(text.len());
    for piece in text.split_inclusive('\n') {
        let (line, ending) = match piece.strip_suffix('\n') {
            Some(line) => (line, "\n"),
            None => (piece, ""),
        };
        if !line.trim().is_empty() {
            out.push_str(line.strip_prefix(margin).unwrap_or(line));
        }
        out.push_str(ending);
    }
    out
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_map_lines() {
        let source = "line1\nline2\r\nline3";
        let sm = SourceMap::new(source);
        assert_eq!(sm.line_count(), 3);
        assert_eq!(sm.line_text(source, 1), Some("line1"));
        assert_eq!(sm.line_text(source, 2), Some("line2"));
        assert_eq!(sm.line_text(source, 3), Some("line3"));
        assert_eq!(sm.line_text(source, 0), None);
        assert_eq!(sm.line_text(source, 4), None);
    }

    #[test]
    fn test_resolve() {
        let sm = SourceMap::new("hello\nworld");
        assert_eq!(sm.resolve(0), SourcePosition { line: 1, column: 0 });
        assert_eq!(sm.resolve(5), SourcePosition { line: 1, column: 5 });
        assert_eq!(sm.resolve(6), SourcePosition { line: 2, column: 0 });
        assert_eq!(sm.resolve(8), SourcePosition { line: 2, column: 2 });
    }

    #[test]
    fn test_resolve_many_lines() {
        let source = (0..500)
            .map(|i| format!("line_{}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let sm = SourceMap::new(&source);
        assert_eq!(sm.line_count(), 500);
        assert_eq!(sm.line_text(&source, 250), Some("line_249"));
    }

    #[test]
    fn test_source_unit_positions() {
        let unit = SourceUnit::parse("x = 1\nif x:\n    y = 2\n").unwrap();
        assert_eq!(unit.module().body.len(), 2);
        let stmt = &unit.module().body[1];
        let pos = unit.position(stmt.span);
        assert_eq!(pos.line, 2);
        assert_eq!(unit.line_text(pos.line), "if x:");
        assert_eq!(unit.line_text(99), "");
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("    a\n      b\n"), "a\n  b\n");
        assert_eq!(dedent("  a\n\n  b"), "a\n\nb");
        assert_eq!(dedent("\ta\n\t\tb\n"), "a\n\tb\n");
        assert_eq!(dedent("a\n  b\n"), "a\n  b\n");
        assert_eq!(dedent("    a\n   \n    b\n"), "a\n\nb\n");
    }

    #[test]
    fn test_snippet_parses_indented_block() {
        let snippet = "
            def f():
                return 1
        ";
        let unit = SourceUnit::from_snippet(snippet).unwrap();
        assert_eq!(unit.module().body.len(), 1);
        assert!(SourceUnit::parse(snippet).is_err());
    }
}
