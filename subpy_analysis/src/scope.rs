//! Lexical scope tracking for closure detection.

use smallvec::SmallVec;
use subpy_parser::Stmt;

/// Kind of lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Module level.
    Global,
    /// A `def` or `async def` body.
    Function,
    /// A `class` body.
    Class,
}

/// One open scope and the definition that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ScopeFrame<'ast> {
    /// Scope kind.
    pub kind: ScopeKind,
    /// Owning definition (`None` for the global frame).
    pub owner: Option<&'ast Stmt>,
}

/// Stack of open scopes. The bottom frame is always global.
#[derive(Debug)]
pub struct ScopeTracker<'ast> {
    frames: SmallVec<[ScopeFrame<'ast>; 8]>,
}

impl<'ast> ScopeTracker<'ast> {
    /// A tracker holding only the global frame.
    #[must_use]
    pub fn new() -> Self {
        let mut frames = SmallVec::new();
        frames.push(ScopeFrame {
            kind: ScopeKind::Global,
            owner: None,
        });
        Self { frames }
    }

    /// Innermost open frame.
    #[inline]
    #[must_use]
    pub fn current(&self) -> ScopeFrame<'ast> {
        self.frames.last().copied().unwrap_or(ScopeFrame {
            kind: ScopeKind::Global,
            owner: None,
        })
    }

    /// True if the innermost frame is a function body.
    #[inline]
    #[must_use]
    pub fn in_function(&self) -> bool {
        self.current().kind == ScopeKind::Function
    }

    /// Number of open frames, including the global one.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a frame.
    pub fn push(&mut self, kind: ScopeKind, owner: &'ast Stmt) {
        self.frames.push(ScopeFrame {
            kind,
            owner: Some(owner),
        });
    }

    /// Close the innermost frame. The global frame is never popped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }
}

impl Default for ScopeTracker<'_> {
    fn default() -> Self {
        Self::new()
    }
}
