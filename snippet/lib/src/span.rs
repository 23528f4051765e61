use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A `(position, length)` pair locating a substring of the original,
/// unmodified template text.
///
/// Offsets are UTF-8 byte offsets. Spans produced by the parser always
/// start and end on `char` boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub position: usize,
    pub length: usize,
}

impl TextSpan {
    pub fn new(position: usize, length: usize) -> Self {
        Self { position, length }
    }

    /// Offset one past the last byte of the span.
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.position..self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns `true` when the two spans share at least one byte.
    pub fn overlaps(&self, other: &TextSpan) -> bool {
        self.position < other.end() && other.position < self.end()
    }

    /// Slices `text` at this span.
    ///
    /// Returns `None` if the span falls outside `text` or off a `char`
    /// boundary.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.range())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.position, self.end())
    }
}
