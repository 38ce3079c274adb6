//! Byte positions of tokens in the source text.
//!
//! Tokens and diagnostics carry a `Span` so callers can point back at the
//! markup that produced them. The document tree itself is position-free.

use std::ops::Range;

/// A byte range `[start, end)` in the source text.
///
/// # Example
///
/// ```rust
/// use docai_core::span::Span;
///
/// let span = Span::new(6, 10);
/// assert_eq!(span.len(), 4);
/// assert_eq!(span.slice("<dict>a: b</dict>"), "a: b");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Starting byte offset (inclusive).
    pub start: u32,
    /// Ending byte offset (exclusive).
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Build a span from `usize` offsets as produced by string scanning.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }

    /// An empty span at `offset`, used for the end-of-input token.
    #[inline]
    pub fn empty_at(offset: usize) -> Self {
        Self::from_range(offset..offset)
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The source text covered by this span, or `""` if it does not fit `input`.
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input
            .get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }
}
