//! Significant-whitespace bookkeeping.
//!
//! Tracks the stack of open indentation columns and the bracket depth that
//! suspends it, and turns each logical line's leading whitespace into
//! `Indent`/`Dedent` counts.

use super::cursor::Cursor;

/// Tab stops fall on multiples of this column.
pub const TAB_SIZE: usize = 8;

/// Deepest block nesting accepted.
pub const MAX_INDENT_DEPTH: usize = 100;

const TAB_ERROR: &str = "inconsistent use of tabs and spaces in indentation";

/// Leading whitespace of a line, measured twice: with tab stops every
/// [`TAB_SIZE`] columns and with every tab counting as one column.
///
/// Two lines whose order differs between the measures only agree by accident
/// of the tab size, and are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indentation {
    /// Column with tab stops.
    pub column: usize,
    /// Column with tabs as single characters.
    pub alt_column: usize,
}

impl Indentation {
    /// Indentation of `width` spaces.
    #[must_use]
    pub const fn spaces(width: usize) -> Self {
        Self {
            column: width,
            alt_column: width,
        }
    }
}

/// Outcome of comparing a new line's indentation with the open blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChange {
    /// Same column as the innermost block.
    Same,
    /// One new block opened.
    Indent,
    /// This many blocks closed.
    Dedent(usize),
}

/// Stack of indentation levels plus bracket nesting.
#[derive(Debug, Clone)]
pub struct IndentStack {
    levels: Vec<Indentation>,
    bracket_depth: usize,
}

impl IndentStack {
    /// Create a tracker at column 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: vec![Indentation::default()],
            bracket_depth: 0,
        }
    }

    /// Innermost open level.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Indentation {
        self.levels.last().copied().unwrap_or_default()
    }

    /// Number of open blocks, excluding the module level.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Inside `()`, `[]` or `{}` newlines and indentation are insignificant.
    #[inline]
    #[must_use]
    pub const fn in_brackets(&self) -> bool {
        self.bracket_depth > 0
    }

    /// Enter a bracket pair.
    #[inline]
    pub fn open_bracket(&mut self) {
        self.bracket_depth += 1;
    }

    /// Leave a bracket pair; unbalanced closers are ignored.
    #[inline]
    pub fn close_bracket(&mut self) {
        self.bracket_depth = self.bracket_depth.saturating_sub(1);
    }

    /// Compare `indent` with the open blocks and update the stack.
    ///
    /// # Errors
    /// Returns a message when a dedent lands between two open levels, when
    /// tabs and spaces are mixed inconsistently, or past
    /// [`MAX_INDENT_DEPTH`] open blocks.
    pub fn change_to(&mut self, indent: Indentation) -> Result<IndentChange, &'static str> {
        let current = self.current();
        if indent.column == current.column {
            if indent.alt_column != current.alt_column {
                return Err(TAB_ERROR);
            }
            return Ok(IndentChange::Same);
        }
        if indent.column > current.column {
            if indent.alt_column <= current.alt_column {
                return Err(TAB_ERROR);
            }
            if self.depth() >= MAX_INDENT_DEPTH {
                return Err("too many levels of indentation");
            }
            self.levels.push(indent);
            return Ok(IndentChange::Indent);
        }

        let mut closed = 0;
        while self.current().column > indent.column {
            self.levels.pop();
            closed += 1;
        }
        let landed = self.current();
        if landed.column != indent.column {
            return Err("unindent does not match any outer indentation level");
        }
        if landed.alt_column != indent.alt_column {
            return Err(TAB_ERROR);
        }
        Ok(IndentChange::Dedent(closed))
    }

    /// Close every open block, returning how many were open.
    pub fn close_all(&mut self) -> usize {
        let open = self.depth();
        self.levels.truncate(1);
        open
    }
}

impl Default for IndentStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume leading spaces, tabs and form feeds and measure them.
pub fn measure_indent(cursor: &mut Cursor<'_>) -> Indentation {
    let mut indent = Indentation::default();
    loop {
        match cursor.first() {
            ' ' => {
                indent.column += 1;
                indent.alt_column += 1;
            }
            '\t' => {
                indent.column = (indent.column / TAB_SIZE + 1) * TAB_SIZE;
                indent.alt_column += 1;
            }
            '\x0c' => indent = Indentation::default(),
            _ => return indent,
        }
        cursor.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(column: usize) -> Indentation {
        Indentation::spaces(column)
    }

    fn measure(text: &str) -> Indentation {
        measure_indent(&mut Cursor::new(text))
    }

    #[test]
    fn test_new_stack() {
        let stack = IndentStack::new();
        assert_eq!(stack.current(), at(0));
        assert_eq!(stack.depth(), 0);
        assert!(!stack.in_brackets());
    }

    #[test]
    fn test_indent_and_same() {
        let mut stack = IndentStack::new();
        assert_eq!(stack.change_to(at(4)), Ok(IndentChange::Indent));
        assert_eq!(stack.change_to(at(4)), Ok(IndentChange::Same));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_multi_dedent() {
        let mut stack = IndentStack::new();
        stack.change_to(at(4)).unwrap();
        stack.change_to(at(8)).unwrap();
        stack.change_to(at(12)).unwrap();
        assert_eq!(stack.change_to(at(4)), Ok(IndentChange::Dedent(2)));
        assert_eq!(stack.current().column, 4);
    }

    #[test]
    fn test_inconsistent_dedent() {
        let mut stack = IndentStack::new();
        stack.change_to(at(4)).unwrap();
        assert!(stack.change_to(at(2)).is_err());
    }

    #[test]
    fn test_tab_then_spaces_is_inconsistent() {
        // A tab and eight spaces share a column only with 8-wide tab stops.
        let mut stack = IndentStack::new();
        stack.change_to(measure("\tpass")).unwrap();
        assert_eq!(stack.change_to(measure("        pass")), Err(TAB_ERROR));

        let mut stack = IndentStack::new();
        stack.change_to(measure("        pass")).unwrap();
        assert_eq!(stack.change_to(measure("\tpass")), Err(TAB_ERROR));
    }

    #[test]
    fn test_consistent_tabs_are_accepted() {
        let mut stack = IndentStack::new();
        assert_eq!(stack.change_to(measure("\tx")), Ok(IndentChange::Indent));
        assert_eq!(stack.change_to(measure("\t\tx")), Ok(IndentChange::Indent));
        assert_eq!(stack.change_to(measure("\t        x")), Err(TAB_ERROR));
        assert_eq!(stack.change_to(measure("\tx")), Ok(IndentChange::Dedent(1)));
    }

    #[test]
    fn test_dedent_onto_mismatched_tabs() {
        let mut stack = IndentStack::new();
        stack.change_to(measure("\tx")).unwrap();
        stack.change_to(measure("\t    x")).unwrap();
        assert_eq!(stack.change_to(measure("        x")), Err(TAB_ERROR));
    }

    #[test]
    fn test_indent_depth_limit() {
        let mut stack = IndentStack::new();
        for level in 1..=MAX_INDENT_DEPTH {
            assert_eq!(stack.change_to(at(level)), Ok(IndentChange::Indent));
        }
        assert_eq!(
            stack.change_to(at(MAX_INDENT_DEPTH + 1)),
            Err("too many levels of indentation")
        );
    }

    #[test]
    fn test_close_all() {
        let mut stack = IndentStack::new();
        stack.change_to(at(2)).unwrap();
        stack.change_to(at(6)).unwrap();
        assert_eq!(stack.close_all(), 2);
        assert_eq!(stack.close_all(), 0);
    }

    #[test]
    fn test_bracket_depth() {
        let mut stack = IndentStack::new();
        stack.open_bracket();
        stack.open_bracket();
        stack.close_bracket();
        assert!(stack.in_brackets());
        stack.close_bracket();
        stack.close_bracket();
        assert!(!stack.in_brackets());
    }

    #[test]
    fn test_measure_indent() {
        assert_eq!(measure("    x"), at(4));
        assert_eq!(measure("x"), at(0));
        assert_eq!(
            measure("\tx"),
            Indentation {
                column: 8,
                alt_column: 1
            }
        );
        assert_eq!(measure("  \tx").column, 8);
        assert_eq!(
            measure("\t  x"),
            Indentation {
                column: 10,
                alt_column: 3
            }
        );

        let mut cursor = Cursor::new("   # c");
        assert_eq!(measure_indent(&mut cursor), at(3));
        assert_eq!(cursor.first(), '#');
    }
}
