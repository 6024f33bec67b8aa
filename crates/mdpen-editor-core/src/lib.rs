//! mdpen-editor-core: selection-aware markdown editing without framework dependencies.
//!
//! This crate provides:
//! - `TextBuffer` trait for text storage abstraction, with `EditorRope`
//! - `apply`, the replace-selection-and-reselect primitive
//! - `FormatAction`, every toolbar formatting command with typed options
//! - `TextHost`, the capability surface of the widget that owns the text

pub mod document;
pub mod execute;
pub mod format;
pub mod table;
pub mod text;
pub mod text_helpers;
pub mod transform;
pub mod types;

pub use document::{PlainEditor, TextHost};
pub use execute::{apply_macro, execute_format};
pub use format::{
    CodeBlockOptions, FootnoteOptions, FormatAction, HeaderOptions, ImageOptions, LinkOptions,
    MacroOptions, PlaceholderOptions,
};
pub use smol_str::SmolStr;
pub use table::csv_to_table;
pub use text::{EditorRope, TextBuffer, utf16_len};
pub use transform::{FnTransform, TextTransform, Transformed, apply, apply_to_str};
pub use types::SelectionRange;
