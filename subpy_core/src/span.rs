//! Byte-offset source spans.

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: u32,
    /// End offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Span over `usize` offsets.
    ///
    /// Offsets past `u32::MAX` saturate; callers that accept arbitrary text
    /// reject anything longer than [`Span::MAX_OFFSET`] first.
    #[inline]
    #[must_use]
    pub fn from_offsets(start: usize, end: usize) -> Self {
        let clamp = |offset: usize| u32::try_from(offset).unwrap_or(u32::MAX);
        Self::new(clamp(start), clamp(end))
    }

    /// Largest offset a span can hold exactly.
    pub const MAX_OFFSET: usize = u32::MAX as usize;

    /// A zero-width span at offset 0, for synthesized nodes.
    #[inline]
    #[must_use]
    pub const fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span covers no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_offsets_saturates() {
        assert_eq!(Span::from_offsets(3, 7), Span::new(3, 7));
        let far = Span::from_offsets(1, usize::MAX);
        assert_eq!(far, Span::new(1, u32::MAX));
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(4, 10);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_dummy_is_empty() {
        assert!(Span::dummy().is_empty());
    }

    #[test]
    fn test_cover() {
        let a = Span::new(2, 5);
        let b = Span::new(8, 12);
        assert_eq!(a.cover(b), Span::new(2, 12));
        assert_eq!(b.cover(a), Span::new(2, 12));
    }
}
