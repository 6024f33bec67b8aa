//! Text buffer abstraction for editor storage.
//!
//! The `TextBuffer` trait is the storage surface every transformation works
//! against. Edits are addressed in chars; the browser talks in UTF-16 code
//! units, so the trait also carries the conversions between the two.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// A text buffer that supports editing and offset conversion.
///
/// Edit offsets are in Unicode scalar values (chars). Selections coming from
/// the host are in UTF-16 code units and go through `utf16_to_char` first.
pub trait TextBuffer {
    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Total length in UTF-16 code units.
    fn len_utf16(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Append text at end.
    fn push(&mut self, text: &str) {
        self.insert(self.len_chars(), text);
    }

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;

    /// Convert a char offset to a UTF-16 offset. Clamps past the end.
    fn char_to_utf16(&self, char_offset: usize) -> usize;

    /// Convert a UTF-16 offset to a char offset. Clamps past the end.
    ///
    /// An offset that lands between the halves of a surrogate pair resolves
    /// to the char that owns the pair.
    fn utf16_to_char(&self, utf16_offset: usize) -> usize;
}

/// Ropey-backed text buffer.
#[derive(Clone, Debug, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create a new empty rope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Get a reference to the underlying rope.
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn len_utf16(&self) -> usize {
        self.rope.len_utf16_cu()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    fn push(&mut self, text: &str) {
        self.rope.insert(self.rope.len_chars(), text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        let len = self.rope.len_chars();
        let end = char_range.end.min(len);
        let start = char_range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn char_to_utf16(&self, char_offset: usize) -> usize {
        self.rope
            .char_to_utf16_cu(char_offset.min(self.rope.len_chars()))
    }

    fn utf16_to_char(&self, utf16_offset: usize) -> usize {
        self.rope
            .utf16_cu_to_char(utf16_offset.min(self.rope.len_utf16_cu()))
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rope = EditorRope::from_str("hello world");
        assert_eq!(rope.len_chars(), 11);

        rope.insert(5, " beautiful");
        assert_eq!(rope.to_string(), "hello beautiful world");

        rope.delete(5..15);
        assert_eq!(rope.to_string(), "hello world");

        rope.push("!");
        assert_eq!(rope.to_string(), "hello world!");
    }

    #[test]
    fn test_slice() {
        let rope = EditorRope::from_str("hello world");
        assert_eq!(rope.slice(0..5).as_deref(), Some("hello"));
        assert_eq!(rope.slice(6..11).as_deref(), Some("world"));
        assert_eq!(rope.slice(0..100), None);
    }

    #[test]
    fn test_replace() {
        let mut rope = EditorRope::from_str("hello world");
        rope.replace(6..11, "rust");
        assert_eq!(rope.to_string(), "hello rust");
    }

    #[test]
    fn test_delete_out_of_range_is_clamped() {
        let mut rope = EditorRope::from_str("abc");
        rope.delete(1..50);
        assert_eq!(rope.to_string(), "a");
    }

    #[test]
    fn test_utf16_conversion() {
        // 😀 is one char but two UTF-16 code units.
        let rope = EditorRope::from_str("a😀b");
        assert_eq!(rope.len_chars(), 3);
        assert_eq!(rope.len_utf16(), 4);

        assert_eq!(rope.char_to_utf16(1), 1);
        assert_eq!(rope.char_to_utf16(2), 3);
        assert_eq!(rope.utf16_to_char(3), 2);
        assert_eq!(rope.utf16_to_char(4), 3);

        // Past the end clamps.
        assert_eq!(rope.utf16_to_char(40), 3);
        assert_eq!(rope.char_to_utf16(40), 4);
    }

    #[test]
    fn test_utf16_len() {
        assert_eq!(utf16_len("**bold**"), 8);
        assert_eq!(utf16_len("é😀"), 3);
    }
}
