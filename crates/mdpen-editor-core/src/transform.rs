//! The selection-based replacement primitive every formatting command uses.
//!
//! A transform decides what text to produce; `apply` decides where it goes
//! and what ends up selected afterwards. The engine always re-selects exactly
//! the text it inserted so commands can be chained on the fresh output.
//! Transforms that also append to the end of the document (macro
//! definitions) go through the same path, with the appended block selected.

use crate::text::{EditorRope, TextBuffer, utf16_len};
use crate::types::SelectionRange;

/// Produces replacement text for a selection.
pub trait TextTransform {
    /// Text to put in place of the selected `text`.
    fn selected(&self, text: &str) -> String;

    /// Text to insert at the caret when nothing is selected.
    fn no_selection(&self) -> String;

    /// Block to append at the end of the document when `text` is selected.
    fn appended(&self, text: &str) -> Option<String> {
        let _ = text;
        None
    }
}

impl<T: TextTransform + ?Sized> TextTransform for &T {
    fn selected(&self, text: &str) -> String {
        (**self).selected(text)
    }

    fn no_selection(&self) -> String {
        (**self).no_selection()
    }

    fn appended(&self, text: &str) -> Option<String> {
        (**self).appended(text)
    }
}

/// A transform assembled from two closures.
pub struct FnTransform<S, N> {
    selected: S,
    no_selection: N,
}

impl<S, N> FnTransform<S, N>
where
    S: Fn(&str) -> String,
    N: Fn() -> String,
{
    pub fn new(selected: S, no_selection: N) -> Self {
        Self {
            selected,
            no_selection,
        }
    }
}

impl<S, N> TextTransform for FnTransform<S, N>
where
    S: Fn(&str) -> String,
    N: Fn() -> String,
{
    fn selected(&self, text: &str) -> String {
        (self.selected)(text)
    }

    fn no_selection(&self) -> String {
        (self.no_selection)()
    }
}

/// Replace `selection` in `buffer` with the transform's output.
///
/// Returns the new selection, which spans exactly the inserted text. When
/// the transform appends a block to the end of the document, the block is
/// selected instead. A selection reaching past the end of the buffer is
/// clamped first.
pub fn apply<B, T>(buffer: &mut B, selection: SelectionRange, transform: &T) -> SelectionRange
where
    B: TextBuffer + ?Sized,
    T: TextTransform + ?Sized,
{
    let selection = selection.clamp_to(buffer.len_utf16());
    let start = buffer.utf16_to_char(selection.start);
    let end = buffer.utf16_to_char(selection.end);

    let (inserted, appended) = if selection.is_caret() {
        (transform.no_selection(), None)
    } else {
        let text = buffer.slice(start..end).unwrap_or_default();
        (transform.selected(&text), transform.appended(&text))
    };

    buffer.replace(start..end, &inserted);

    if let Some(block) = appended {
        buffer.push(&block);
        let doc_end = buffer.len_utf16();
        tracing::debug!(
            start = selection.start,
            end = selection.end,
            appended_len = utf16_len(&block),
            "applied text transform with appended block"
        );
        return SelectionRange::new(doc_end - utf16_len(&block), doc_end);
    }

    let new_start = buffer.char_to_utf16(start);
    let new_selection = SelectionRange::new(new_start, new_start + utf16_len(&inserted));
    tracing::debug!(
        start = selection.start,
        end = selection.end,
        inserted_len = new_selection.len(),
        "applied text transform"
    );
    new_selection
}

/// Result of transforming a plain string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub selection: SelectionRange,
}

/// Run `apply` over a plain string.
pub fn apply_to_str<T>(text: &str, selection: SelectionRange, transform: &T) -> Transformed
where
    T: TextTransform + ?Sized,
{
    let mut rope = EditorRope::from_str(text);
    let selection = apply(&mut rope, selection, transform);
    Transformed {
        text: rope.to_string(),
        selection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap() -> impl TextTransform {
        FnTransform::new(|t: &str| format!("<{t}>"), || "<>".to_string())
    }

    #[test]
    fn test_caret_inserts_default() {
        let out = apply_to_str("abc", SelectionRange::caret(1), &wrap());
        assert_eq!(out.text, "a<>bc");
        assert_eq!(out.selection, SelectionRange::new(1, 3));
    }

    #[test]
    fn test_selection_is_replaced() {
        let out = apply_to_str("hello world", SelectionRange::new(6, 11), &wrap());
        assert_eq!(out.text, "hello <world>");
        assert_eq!(out.selection, SelectionRange::new(6, 13));
    }

    #[test]
    fn test_selection_past_end_is_clamped() {
        let out = apply_to_str("abc", SelectionRange::new(1, 99), &wrap());
        assert_eq!(out.text, "a<bc>");
        assert_eq!(out.selection, SelectionRange::new(1, 5));
    }

    #[test]
    fn test_appended_block_is_selected() {
        struct Footer;
        impl TextTransform for Footer {
            fn selected(&self, text: &str) -> String {
                format!("[{text}]")
            }
            fn no_selection(&self) -> String {
                "[]".to_string()
            }
            fn appended(&self, text: &str) -> Option<String> {
                Some(format!("\n{text}: note"))
            }
        }

        let out = apply_to_str("a word here", SelectionRange::new(2, 6), &Footer);
        assert_eq!(out.text, "a [word] here\nword: note");
        assert_eq!(out.selection, SelectionRange::new(13, 24));

        // Nothing is appended at a caret.
        let out = apply_to_str("ab", SelectionRange::caret(1), &Footer);
        assert_eq!(out.text, "a[]b");
        assert_eq!(out.selection, SelectionRange::new(1, 3));
    }

    #[test]
    fn test_offsets_are_utf16() {
        // 😀 occupies UTF-16 offsets 0..2.
        let out = apply_to_str("😀ab", SelectionRange::new(2, 4), &wrap());
        assert_eq!(out.text, "😀<ab>");
        assert_eq!(out.selection, SelectionRange::new(2, 6));

        let emoji = FnTransform::new(|t: &str| t.to_string(), || "😀".to_string());
        let out = apply_to_str("ab", SelectionRange::caret(2), &emoji);
        assert_eq!(out.text, "ab😀");
        assert_eq!(out.selection, SelectionRange::new(2, 4));
    }
}
