//! Selection types shared by the transformation engine and its hosts.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// The user's highlighted text, in UTF-16 code units.
///
/// Offsets match what a browser `<textarea>` reports through
/// `selectionStart`/`selectionEnd`. `start == end` is a caret with nothing
/// selected.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Create a selection, swapping the bounds if they are reversed.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A zero-width selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Check if nothing is selected.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Selected length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clamp both bounds into `0..=len`.
    pub fn clamp_to(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    /// Convert to a `Range<usize>`.
    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for SelectionRange {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<SelectionRange> for Range<usize> {
    fn from(s: SelectionRange) -> Self {
        s.start..s.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_bounds_normalize() {
        let sel = SelectionRange::new(10, 5);
        assert_eq!(sel.start, 5);
        assert_eq!(sel.end, 10);
        assert_eq!(sel.len(), 5);
    }

    #[test]
    fn test_caret() {
        let sel = SelectionRange::caret(7);
        assert!(sel.is_caret());
        assert!(sel.is_empty());
        assert_eq!(sel.to_range(), 7..7);
    }

    #[test]
    fn test_clamp_to() {
        let sel = SelectionRange::new(3, 20).clamp_to(10);
        assert_eq!(sel, SelectionRange::new(3, 10));

        let sel = SelectionRange::new(15, 20).clamp_to(10);
        assert!(sel.is_caret());
        assert_eq!(sel.start, 10);
    }
}
