//! Per-file upload state.

use smol_str::SmolStr;

use crate::file::UploadFile;

/// Lifecycle of one file upload.
///
/// Tasks move `Pending -> InFlight -> Succeeded | Failed` and never go back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadState {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

impl UploadState {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Snapshot of one task within a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTask {
    /// Position in the order the files were chosen
    pub index: usize,
    pub file_name: SmolStr,
    pub size: u64,
    pub bytes_loaded: u64,
    pub state: UploadState,
}

impl UploadTask {
    pub(crate) fn new(index: usize, file: &UploadFile) -> Self {
        Self {
            index,
            file_name: file.name.clone(),
            size: file.size,
            bytes_loaded: 0,
            state: UploadState::Pending,
        }
    }

    /// Move to `next` unless that would go backwards.
    pub(crate) fn advance(&mut self, next: UploadState) -> bool {
        let allowed = match (self.state, next) {
            (UploadState::Pending, UploadState::InFlight) => true,
            (UploadState::Pending | UploadState::InFlight, UploadState::Succeeded) => true,
            (UploadState::Pending | UploadState::InFlight, UploadState::Failed) => true,
            _ => false,
        };
        if allowed {
            self.state = next;
        }
        allowed
    }

    /// Record an absolute byte count. Counts only move forward.
    pub(crate) fn record_loaded(&mut self, loaded: u64) {
        self.bytes_loaded = self.bytes_loaded.max(loaded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> UploadTask {
        UploadTask::new(0, &UploadFile::new("a.txt", "hello"))
    }

    #[test]
    fn test_transitions_only_move_forward() {
        let mut t = task();
        assert!(t.advance(UploadState::InFlight));
        assert!(t.advance(UploadState::Succeeded));
        assert!(!t.advance(UploadState::InFlight));
        assert!(!t.advance(UploadState::Failed));
        assert_eq!(t.state, UploadState::Succeeded);
        assert!(t.state.is_finished());
    }

    #[test]
    fn test_loaded_never_decreases() {
        let mut t = task();
        t.record_loaded(4);
        t.record_loaded(2);
        assert_eq!(t.bytes_loaded, 4);
    }
}
