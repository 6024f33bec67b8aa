//! Aggregate progress for the files from one user action.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::UploadError;
use crate::file::UploadFile;
use crate::progress::{ProgressSink, UploadFailure};
use crate::task::{UploadState, UploadTask};

static NEXT_BATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique batch identifier, increasing in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(u64);

impl BatchId {
    fn next() -> Self {
        Self(NEXT_BATCH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch-{}", self.0)
    }
}

/// Integer percentage of `loaded` over `expected`, rounded up and capped at 100.
///
/// An empty batch is complete.
pub fn progress_percent(loaded: u64, expected: u64) -> u8 {
    if expected == 0 {
        return 100;
    }
    let loaded = u128::from(loaded.min(expected));
    let expected = u128::from(expected);
    ((loaded * 100).div_ceil(expected)) as u8
}

struct BatchState {
    tasks: Vec<UploadTask>,
    last_percent: Option<u8>,
}

impl BatchState {
    fn total_loaded(&self) -> u64 {
        self.tasks.iter().map(|t| t.bytes_loaded).sum()
    }
}

/// The tasks created from one picker selection or drop.
///
/// `total_bytes_expected` is fixed when the batch is created. Progress
/// updates from concurrent tasks are serialized through an internal lock,
/// and the sink is called while that lock is held so it observes
/// percentages in order.
pub struct UploadBatch {
    id: BatchId,
    total_bytes_expected: u64,
    state: Mutex<BatchState>,
    sink: Arc<dyn ProgressSink>,
}

impl UploadBatch {
    pub fn new(files: &[UploadFile], sink: Arc<dyn ProgressSink>) -> Self {
        let tasks: Vec<_> = files
            .iter()
            .enumerate()
            .map(|(index, file)| UploadTask::new(index, file))
            .collect();
        Self {
            id: BatchId::next(),
            total_bytes_expected: tasks.iter().map(|t| t.size).sum(),
            state: Mutex::new(BatchState {
                tasks,
                last_percent: None,
            }),
            sink,
        }
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn total_bytes_expected(&self) -> u64 {
        self.total_bytes_expected
    }

    pub fn total_bytes_loaded(&self) -> u64 {
        self.state().total_loaded()
    }

    pub fn len(&self) -> usize {
        self.state().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest percentage reached so far.
    pub fn percent(&self) -> u8 {
        let state = self.state();
        let current = progress_percent(state.total_loaded(), self.total_bytes_expected);
        state.last_percent.map_or(current, |last| last.max(current))
    }

    /// Snapshot of every task, in file order.
    pub fn tasks(&self) -> Vec<UploadTask> {
        self.state().tasks.clone()
    }

    pub fn task(&self, index: usize) -> Option<UploadTask> {
        self.state().tasks.get(index).cloned()
    }

    pub(crate) fn task_size(&self, index: usize) -> Option<u64> {
        self.state().tasks.get(index).map(|t| t.size)
    }

    /// Record an absolute byte count for one task and report the batch
    /// percentage. Returns the percentage after the update.
    pub fn record_progress(&self, index: usize, loaded: u64) -> u8 {
        let mut state = self.state();
        let Some(task) = state.tasks.get_mut(index) else {
            tracing::warn!(batch = %self.id, index, "progress for unknown task");
            return state.last_percent.unwrap_or(0);
        };
        task.record_loaded(loaded);
        self.report(&mut state)
    }

    pub fn mark_in_flight(&self, index: usize) {
        let mut state = self.state();
        if let Some(task) = state.tasks.get_mut(index) {
            task.advance(UploadState::InFlight);
        }
    }

    /// Mark a task done. Its bytes count as fully loaded, so a batch whose
    /// tasks all succeed always reaches 100.
    pub fn mark_succeeded(&self, index: usize, url: &str) {
        let mut state = self.state();
        let Some(task) = state.tasks.get_mut(index) else {
            return;
        };
        if !task.advance(UploadState::Succeeded) {
            return;
        }
        task.record_loaded(task.size);
        let file_name = task.file_name.clone();
        self.report(&mut state);
        self.sink.on_complete(self.id, &file_name, url);
    }

    /// Mark a task failed and notify the sink. Progress of other tasks is
    /// unaffected.
    pub fn mark_failed(&self, index: usize, error: &UploadError) {
        let mut state = self.state();
        let Some(task) = state.tasks.get_mut(index) else {
            return;
        };
        if !task.advance(UploadState::Failed) {
            return;
        }
        let file_name = task.file_name.clone();
        self.sink.on_failure(
            self.id,
            &UploadFailure {
                index,
                file_name: &file_name,
                error,
            },
        );
    }

    fn report(&self, state: &mut MutexGuard<'_, BatchState>) -> u8 {
        let current = progress_percent(state.total_loaded(), self.total_bytes_expected);
        match state.last_percent {
            Some(last) if current <= last => last,
            _ => {
                state.last_percent = Some(current);
                self.sink.on_progress(self.id, current);
                current
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, BatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for UploadBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadBatch")
            .field("id", &self.id)
            .field("total_bytes_expected", &self.total_bytes_expected)
            .field("tasks", &self.state().tasks)
            .finish()
    }
}
