//! Editor host trait and a plain implementation.
//!
//! Defines the `TextHost` trait: the capability surface the engine needs
//! from whatever widget owns the text (content, selection, mutation, focus).
//! Formatting commands and upload link insertion are provided methods, so
//! every host gets the same selection handling.

use crate::execute::execute_format;
use crate::format::FormatAction;
use crate::text::{TextBuffer, utf16_len};
use crate::types::SelectionRange;

/// The widget that owns the text being edited.
///
/// Implementations only store state. The provided methods always read the
/// host's current content and selection, so edits land where the user is
/// now, not where they were when an operation started.
pub trait TextHost {
    /// The buffer type used for text storage.
    type Buffer: TextBuffer;

    // === Required ===

    /// Get a reference to the underlying buffer.
    fn buffer(&self) -> &Self::Buffer;

    /// Get a mutable reference to the underlying buffer.
    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    /// Current selection, in UTF-16 code units.
    fn selection(&self) -> SelectionRange;

    /// Replace the selection.
    fn set_selection(&mut self, selection: SelectionRange);

    /// Move input focus to the editor.
    fn focus(&mut self);

    // === Provided ===

    /// Get the full content as a String.
    fn content_string(&self) -> String {
        self.buffer().to_string()
    }

    /// Currently selected text; empty at a caret.
    fn selected_text(&self) -> String {
        let sel = self.selection().clamp_to(self.buffer().len_utf16());
        let start = self.buffer().utf16_to_char(sel.start);
        let end = self.buffer().utf16_to_char(sel.end);
        self.buffer()
            .slice(start..end)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Apply a formatting command to the current selection, then focus the
    /// editor with the output selected.
    fn apply_format(&mut self, action: &FormatAction) -> SelectionRange {
        let selection = self.selection();
        let selection = execute_format(self.buffer_mut(), selection, action);
        self.focus();
        self.set_selection(selection);
        selection
    }

    /// Insert `text` at the start of the current selection without
    /// consuming any selected text, then focus with the insertion selected.
    fn insert_at_caret(&mut self, text: &str) -> SelectionRange {
        let len = self.buffer().len_utf16();
        let at = self.selection().start.min(len);
        let char_at = self.buffer().utf16_to_char(at);
        self.buffer_mut().insert(char_at, text);

        let start = self.buffer().char_to_utf16(char_at);
        let selection = SelectionRange::new(start, start + utf16_len(text));
        self.focus();
        self.set_selection(selection);
        selection
    }
}

/// Simple field-based implementation of `TextHost`.
///
/// Use this for non-reactive contexts or as a base for testing.
#[derive(Clone, Debug, Default)]
pub struct PlainEditor<T: TextBuffer> {
    buffer: T,
    selection: SelectionRange,
    focus_requests: usize,
}

impl<T: TextBuffer> PlainEditor<T> {
    /// Create a new editor with the caret at the start.
    pub fn new(buffer: T) -> Self {
        Self {
            buffer,
            selection: SelectionRange::default(),
            focus_requests: 0,
        }
    }

    /// Builder-style selection setter.
    pub fn with_selection(mut self, selection: SelectionRange) -> Self {
        self.selection = selection;
        self
    }

    /// How many times focus was requested.
    pub fn focus_requests(&self) -> usize {
        self.focus_requests
    }
}

impl<T: TextBuffer> TextHost for PlainEditor<T> {
    type Buffer = T;

    fn buffer(&self) -> &Self::Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Self::Buffer {
        &mut self.buffer
    }

    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn set_selection(&mut self, selection: SelectionRange) {
        self.selection = selection;
    }

    fn focus(&mut self) {
        self.focus_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatAction, PlaceholderOptions};
    use crate::text::EditorRope;

    fn make_editor(content: &str, selection: SelectionRange) -> PlainEditor<EditorRope> {
        PlainEditor::new(EditorRope::from_str(content)).with_selection(selection)
    }

    #[test]
    fn test_apply_format_updates_selection_and_focus() {
        let mut editor = make_editor("hello world", SelectionRange::new(6, 11));
        let sel = editor.apply_format(&FormatAction::Italic(PlaceholderOptions::default()));

        assert_eq!(editor.content_string(), "hello _world_");
        assert_eq!(sel, SelectionRange::new(6, 13));
        assert_eq!(editor.selection(), sel);
        assert_eq!(editor.selected_text(), "_world_");
        assert_eq!(editor.focus_requests(), 1);
    }

    #[test]
    fn test_chained_formatting_wraps_previous_output() {
        let mut editor = make_editor("x", SelectionRange::new(0, 1));
        editor.apply_format(&FormatAction::Bold(Default::default()));
        editor.apply_format(&FormatAction::Italic(Default::default()));
        assert_eq!(editor.content_string(), "_**x**_");
        assert_eq!(editor.selection(), SelectionRange::new(0, 7));
    }

    #[test]
    fn test_insert_at_caret_keeps_selected_text() {
        let mut editor = make_editor("abcdef", SelectionRange::new(2, 4));
        let sel = editor.insert_at_caret("[x](y)");

        assert_eq!(editor.content_string(), "ab[x](y)cdef");
        assert_eq!(sel, SelectionRange::new(2, 8));
        assert_eq!(editor.focus_requests(), 1);
    }

    #[test]
    fn test_insert_at_stale_caret_is_clamped() {
        let mut editor = make_editor("ab", SelectionRange::caret(10));
        let sel = editor.insert_at_caret("!");
        assert_eq!(editor.content_string(), "ab!");
        assert_eq!(sel, SelectionRange::new(2, 3));
    }
}
