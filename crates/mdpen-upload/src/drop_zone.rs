//! Drag-and-drop state for the editor surface.
//!
//! Drops and the file picker both start a batch. The zone only decides
//! what the host should do with the browser event and whether to show the
//! dotted drop border.

/// What started a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadSource {
    /// The toolbar file input
    Picker,
    /// Files dropped onto the editor
    Drop,
}

/// How the host should treat the DOM event it just forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventDisposition {
    pub prevent_default: bool,
}

impl EventDisposition {
    pub const PREVENT: Self = Self {
        prevent_default: true,
    };
    pub const PASS: Self = Self {
        prevent_default: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropZone {
    highlighted: bool,
}

impl DropZone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the dotted drop border should be shown.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Dragging over the editor. The default must be prevented or the
    /// browser never fires `drop`.
    pub fn drag_over(&mut self) -> EventDisposition {
        self.highlighted = true;
        EventDisposition::PREVENT
    }

    pub fn drag_leave(&mut self) -> EventDisposition {
        self.highlighted = false;
        EventDisposition::PASS
    }

    /// Files landed on the editor. The default (opening the file) must be
    /// prevented; the caller starts a batch with `UploadSource::Drop`.
    pub fn drop(&mut self) -> EventDisposition {
        self.highlighted = false;
        EventDisposition::PREVENT
    }
}
