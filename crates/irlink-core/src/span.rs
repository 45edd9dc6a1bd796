//! Source location tracking for diagnostics.
//!
//! Provides [`Span`], the byte range an IR element was produced from. Line and
//! column numbers are only recovered on demand through a
//! [`FileEntry`](crate::FileEntry), since most elements never need them.

use std::fmt;

/// A byte range in a source file.
///
/// Synthesized elements (stubs, throwing calls built for them) carry
/// [`Span::UNDEFINED`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start offset in bytes (inclusive).
    pub start: u32,
    /// End offset in bytes (exclusive).
    pub end: u32,
}

impl Span {
    /// Span of an element that does not exist in any source file.
    pub const UNDEFINED: Span = Span {
        start: u32::MAX,
        end: u32::MAX,
    };

    /// Create a new span from a start and end offset.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether this span points nowhere.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        self.start == u32::MAX
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::UNDEFINED
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            write!(f, "<undefined>")
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
