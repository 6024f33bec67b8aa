//! Action execution for text buffers.
//!
//! `execute_format` is the single dispatch point toolbar commands go through.
//! Every command, macros included, runs through `apply`; macros use its
//! append hook to put their definition at the end of the document.

use crate::format::{FormatAction, MacroOptions};
use crate::text::TextBuffer;
use crate::transform::apply;
use crate::types::SelectionRange;

/// Run a formatting command against `selection`, returning the new selection.
pub fn execute_format<B>(
    buffer: &mut B,
    selection: SelectionRange,
    action: &FormatAction,
) -> SelectionRange
where
    B: TextBuffer + ?Sized,
{
    tracing::trace!(command = action.name(), "executing format command");
    apply(buffer, selection, action)
}

/// Insert a flexmark macro.
///
/// At a caret this inserts a demo reference/definition pair in one piece.
/// With a selection, the selected text names the macro: the selection is
/// replaced by an inline reference and the definition block is appended to
/// the end of the document. The returned selection covers the definition
/// only.
pub fn apply_macro<B>(
    buffer: &mut B,
    selection: SelectionRange,
    opts: &MacroOptions,
) -> SelectionRange
where
    B: TextBuffer + ?Sized,
{
    apply(buffer, selection, opts)
}
